//! [`Command`] definition.

pub mod authorize_session;
pub mod create_listing;
pub mod deactivate_listing;
pub mod set_profile_photo;
pub mod update_profile;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_session::AuthorizeSession, create_listing::CreateListing,
    deactivate_listing::DeactivateListing, set_profile_photo::SetProfilePhoto,
    update_profile::UpdateProfile,
};
