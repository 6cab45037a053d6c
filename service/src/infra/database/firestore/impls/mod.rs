//! [`Database`] operation implementations.
//!
//! [`Database`]: crate::infra::Database

mod listing;
mod user;
