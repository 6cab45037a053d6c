//! [`Command`] for updating a [`User`] profile.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`User`] profile.
///
/// Completing the profile for the first time also clears the first-login
/// flag through [`user::ProfileUpdate::first_login`].
#[derive(Clone, Debug, From)]
pub struct UpdateProfile {
    /// [`user::ProfileUpdate`] to apply.
    pub update: user::ProfileUpdate,
}

impl<Db, St, Idp> Command<UpdateProfile> for Service<Db, St, Idp>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<user::ProfileUpdate>, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateProfile) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProfile { update } = cmd;

        let mut user = self
            .database()
            .execute(Select(By::new(update.id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::UserNotExists(update.id.clone()))
            .map_err(tracerr::wrap!())?;

        if update.is_empty() {
            return Ok(user);
        }

        self.database()
            .execute(Update(update.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Some(name) = update.display_name {
            user.display_name = Some(name);
        }
        if let Some(bio) = update.company_bio {
            user.company_bio = Some(bio);
        }
        if let Some(location) = update.company_location {
            user.company_location = Some(location);
        }
        if let Some(number) = update.trade_registry_number {
            user.trade_registry_number = Some(number);
        }
        if let Some(url) = update.photo_url {
            user.photo_url = Some(url);
        }
        if let Some(role) = update.role {
            user.role = Some(role);
        }
        if let Some(first_login) = update.first_login {
            user.first_login = first_login;
        }

        Ok(user)
    }
}

/// Error of [`UpdateProfile`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] to update does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}
