//! [`Command`] for publishing a new [`Listing`].

use common::operations::{Commit, Insert, Transact, Transacted};
use tracerr::Traced;

use crate::{
    domain::{equipment, listing, user, Equipment, Listing, Variant},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for publishing a new [`Listing`].
///
/// The parent document and its [`Equipment`] children are written through a
/// single transactional batch, so a failure mid-way leaves no orphaned
/// records behind. The creation time is stamped by the store on commit.
#[derive(Clone, Debug)]
pub struct CreateListing {
    /// [`Variant`] of the new [`Listing`].
    pub variant: Variant,

    /// [`listing::Title`] of the new [`Listing`].
    pub title: listing::Title,

    /// [`listing::City`] of the new [`Listing`].
    pub city: Option<listing::City>,

    /// [`listing::District`] of the new [`Listing`].
    pub district: Option<listing::District>,

    /// Geographical location of the new [`Listing`].
    pub location: Option<listing::GeoPoint>,

    /// [`listing::Description`] of the new [`Listing`].
    pub description: Option<listing::Description>,

    /// Additional free-form information of the new [`Listing`].
    pub extra_info: Option<listing::ExtraInfo>,

    /// Contact [`listing::Phone`] of the new [`Listing`].
    pub phone: Option<listing::Phone>,

    /// Uploaded photo URLs of the new [`Listing`].
    pub photo_urls: Vec<listing::PhotoUrl>,

    /// [`Equipment`] line items of the new [`Listing`].
    pub equipment: Vec<Equipment>,

    /// Project attributes, for a [`Variant::ProjectRequest`] only.
    pub project: Option<listing::ProjectDetails>,

    /// [`User`] publishing the new [`Listing`].
    ///
    /// [`User`]: crate::domain::User
    pub owner: user::Id,
}

impl<Db, St, Idp> Command<CreateListing> for Service<Db, St, Idp>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Listing>, Err = Traced<database::Error>>
        + Database<Insert<equipment::Record>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateListing) -> Result<Self::Ok, Self::Err> {
        let CreateListing {
            variant,
            title,
            city,
            district,
            location,
            description,
            extra_info,
            phone,
            photo_urls,
            equipment,
            project,
            owner,
        } = cmd;

        let id = listing::Id::generate();
        let listing = Listing {
            id: id.clone(),
            variant,
            title,
            city,
            district,
            location,
            description,
            extra_info,
            phone,
            photo_urls,
            is_active: true,
            equipment_count: equipment.len().try_into().unwrap_or(u32::MAX),
            equipment,
            project,
            created_at: None,
            owner: Some(owner),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        tx.execute(Insert(listing.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        for equipment in listing.equipment.clone() {
            tx.execute(Insert(equipment::Record {
                variant,
                listing: id.clone(),
                equipment,
            }))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(listing)
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
pub type ExecutionError = database::Error;
