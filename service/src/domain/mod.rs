//! Domain definitions.

pub mod equipment;
pub mod listing;
pub mod user;

pub use self::{
    equipment::Equipment,
    listing::{Listing, Variant},
    user::User,
};
