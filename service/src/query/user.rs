//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a single [`User`] profile.
///
/// Listings reference their owner by [`user::Id`] only, so the profile is
/// resolved lazily through this [`Query`].
pub type ById = DatabaseQuery<By<Option<User>, user::Id>>;
