//! [`Database`]-related implementations.

pub mod firestore;

use derive_more::{Display, Error as StdError, From};

pub use self::firestore::Firestore;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Firestore`] error.
    Firestore(firestore::Error),
}
