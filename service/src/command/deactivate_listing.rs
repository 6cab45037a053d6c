//! [`Command`] for deactivating a [`Listing`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, user, Listing, Variant},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deactivating a [`Listing`].
///
/// Only the owner may deactivate their [`Listing`]. Deactivating an already
/// inactive one is a no-op.
#[derive(Clone, Debug)]
pub struct DeactivateListing {
    /// [`Variant`] of the [`Listing`] to deactivate.
    pub variant: Variant,

    /// ID of the [`Listing`] to deactivate.
    pub id: listing::Id,

    /// [`User`] requesting the deactivation.
    ///
    /// [`User`]: crate::domain::User
    pub initiator: user::Id,
}

impl<Db, St, Idp> Command<DeactivateListing> for Service<Db, St, Idp>
where
    Db: Database<
            Select<By<Option<Listing>, (Variant, listing::Id)>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<Update<listing::Deactivation>, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeactivateListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeactivateListing {
            variant,
            id,
            initiator,
        } = cmd;

        let mut listing = self
            .database()
            .execute(Select(By::new((variant, id.clone()))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::ListingNotExists(id.clone()))
            .map_err(tracerr::wrap!())?;

        if listing.owner.as_ref() != Some(&initiator) {
            return Err(tracerr::new!(E::NotOwner(initiator)));
        }

        if !listing.is_active {
            return Ok(listing);
        }

        self.database()
            .execute(Update(listing::Deactivation { variant, id }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        listing.is_active = false;
        Ok(listing)
    }
}

/// Error of [`DeactivateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Listing`] to deactivate does not exist.
    #[display("`Listing(id: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// Initiator is not the owner of the [`Listing`].
    #[display("`User(id: {_0})` is not the owner of the `Listing`")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] user::Id),
}
