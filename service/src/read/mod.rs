//! Read models.

pub mod listing;

pub use self::listing::{Criteria, FilterValues};
