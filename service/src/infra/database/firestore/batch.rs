//! Transactional write [`Batch`].

use std::sync::Mutex;

use common::operations::{Commit, Transact};
use tracerr::Traced;

use crate::infra::{database, Database};

use super::{Firestore, Write};

/// Accumulated set of [`Write`]s applied atomically on [`Commit`].
///
/// Either every write lands or none does, so a failure mid-batch cannot
/// leave a parent document without its children.
#[derive(Debug)]
pub struct Batch {
    /// [`Firestore`] client the [`Write`]s are committed through.
    client: Firestore,

    /// [`Write`]s accumulated so far.
    writes: Mutex<Vec<Write>>,
}

impl Batch {
    /// Queues the given [`Write`] into this [`Batch`].
    pub(super) fn push(&self, write: Write) {
        self.writes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(write);
    }

    /// Returns the [`Firestore`] client of this [`Batch`].
    pub(super) fn client(&self) -> &Firestore {
        &self.client
    }
}

impl Database<Transact> for Firestore {
    type Ok = Batch;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Batch {
            client: self.clone(),
            writes: Mutex::new(vec![]),
        })
    }
}

impl Database<Commit> for Batch {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let writes = std::mem::take(
            &mut *self
                .writes
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        );
        self.client
            .commit(writes)
            .await
            .map_err(tracerr::map_from)
    }
}
