//! Infrastructure layer.

pub mod database;
mod gcp;
pub mod identity;
pub mod storage;

pub use self::{
    database::{firestore, Database, Firestore},
    identity::{GoogleIdentity, Identity},
    storage::{CloudStorage, Storage},
};
