//! Background [`Task`]s definitions.

mod background;
pub mod purge_inactive_listings;

pub use common::Handler as Task;

pub use self::{
    background::Background, purge_inactive_listings::PurgeInactiveListings,
};
