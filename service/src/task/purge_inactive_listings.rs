//! [`PurgeInactiveListings`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{listing, Listing, Variant},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`PurgeInactiveListings`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between purge runs.
    pub interval: time::Duration,

    /// Period an inactive [`Listing`] is retained for before being purged.
    pub retention: time::Duration,
}

/// [`Task`] for purging [`Listing`]s that were deactivated long ago.
///
/// Deactivated [`Listing`]s stay hidden but keep occupying the store, so
/// old enough ones are deleted together with their equipment
/// sub-collections.
#[derive(Clone, Copy, Debug)]
pub struct PurgeInactiveListings<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, St, Idp> Task<Start<By<PurgeInactiveListings<Self>, Config>>>
    for Service<Db, St, Idp>
where
    PurgeInactiveListings<Service<Db, St, Idp>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PurgeInactiveListings<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = PurgeInactiveListings {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::PurgeInactiveListings` failed: {e}");
            });
        }
    }
}

impl<Db, St, Idp> Task<Perform<()>>
    for PurgeInactiveListings<Service<Db, St, Idp>>
where
    Db: Database<
        Delete<By<Listing, (Variant, listing::CreationDateTime)>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline =
            listing::CreationDateTime::now() - self.config.retention;
        for variant in [Variant::EquipmentOffer, Variant::ProjectRequest] {
            self.service
                .database()
                .execute(Delete(By::new((variant, deadline))))
                .await
                .map_err(tracerr::map_from_and_wrap!())?;
        }
        Ok(())
    }
}

/// Error of [`PurgeInactiveListings`] execution.
pub type ExecutionError = Traced<database::Error>;
