//! [`Query`] collection related to a single [`Listing`].

use common::operations::By;

use crate::domain::{listing, Listing, Variant};
#[cfg(doc)]
use crate::{domain::Equipment, Query};

use super::DatabaseQuery;

/// Queries a single [`Listing`] with its [`Equipment`] children loaded.
pub type ById = DatabaseQuery<By<Option<Listing>, (Variant, listing::Id)>>;
