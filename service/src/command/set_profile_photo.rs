//! [`Command`] for setting a [`User`] profile photo.

use common::operations::{By, Perform, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, storage, Database, Storage},
    Service,
};

use super::Command;

/// [`Command`] for setting a [`User`] profile photo.
///
/// Uploads the image bytes to the object storage and records the resulting
/// download URL on the profile.
#[derive(Clone, Debug)]
pub struct SetProfilePhoto {
    /// [`User`] whose photo is being set.
    pub user_id: user::Id,

    /// Original file name of the image, kept in the storage path.
    pub file_name: String,

    /// MIME type of the image.
    pub content_type: String,

    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl<Db, St, Idp> Command<SetProfilePhoto> for Service<Db, St, Idp>
where
    St: Storage<
        Perform<storage::UploadProfilePhoto>,
        Ok = user::PhotoUrl,
        Err = Traced<storage::Error>,
    >,
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<user::ProfileUpdate>, Err = Traced<database::Error>>,
{
    type Ok = user::PhotoUrl;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetProfilePhoto,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetProfilePhoto {
            user_id,
            file_name,
            content_type,
            bytes,
        } = cmd;

        drop(
            self.database()
                .execute(Select(By::new(user_id.clone())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or_else(|| E::UserNotExists(user_id.clone()))
                .map_err(tracerr::wrap!())?,
        );

        let url = self
            .storage()
            .execute(Perform(storage::UploadProfilePhoto {
                user_id: user_id.clone(),
                file_name,
                content_type,
                bytes,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut update = user::ProfileUpdate::of(user_id);
        update.photo_url = Some(url.clone());
        self.database()
            .execute(Update(update))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(url)
    }
}

/// Error of [`SetProfilePhoto`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// [`User`] to set the photo for does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}
