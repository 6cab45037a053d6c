//! [`Query`] collection related to the multiple [`Listing`]s.

use std::convert::Infallible;

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{Listing, Variant},
    infra::{database, Database},
    read,
    Service,
};

use super::Query;

/// [`Query`] of all the [`Listing`]s of a [`Variant`].
///
/// Pulls the whole collection: filtering and windowing happen in memory, so
/// no predicate is pushed down to the store.
#[derive(Clone, Copy, Debug)]
pub struct All {
    /// [`Variant`] of the [`Listing`]s to fetch.
    pub variant: Variant,
}

impl<Db, St, Idp> Query<All> for Service<Db, St, Idp>
where
    Db: Database<
        Select<By<Vec<Listing>, Variant>>,
        Ok = Vec<Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Listing>;
    type Err = Infallible;

    async fn execute(&self, cmd: All) -> Result<Self::Ok, Self::Err> {
        let All { variant } = cmd;

        Ok(self
            .database()
            .execute(Select(By::new(variant)))
            .await
            .unwrap_or_else(|e| {
                // A feed renders as empty rather than failing outright.
                log::warn!("Failed to fetch `{variant}` listings: {e}");
                vec![]
            }))
    }
}

/// [`Query`] of the distinct city and district values occurring in the
/// [`Listing`]s of a [`Variant`].
#[derive(Clone, Copy, Debug)]
pub struct FilterValues {
    /// [`Variant`] of the [`Listing`]s to collect the values from.
    pub variant: Variant,
}

impl<Db, St, Idp> Query<FilterValues> for Service<Db, St, Idp>
where
    Db: Database<
        Select<By<Vec<Listing>, Variant>>,
        Ok = Vec<Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::FilterValues;
    type Err = Infallible;

    async fn execute(&self, cmd: FilterValues) -> Result<Self::Ok, Self::Err> {
        let FilterValues { variant } = cmd;

        let listings = self.execute(All { variant }).await?;
        Ok(read::FilterValues::collect(&listings))
    }
}
