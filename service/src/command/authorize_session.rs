//! [`Command`] for authorizing a [`User`] session.

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, identity, Database, Identity},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`] session.
///
/// Verifies the provider-issued [`identity::Token`] and resolves the
/// [`User`] profile behind it, provisioning a blank one on the first
/// sign-in.
#[derive(Clone, Debug, From)]
pub struct AuthorizeSession {
    /// [`identity::Token`] to authorize.
    pub token: identity::Token,
}

impl<Db, St, Idp> Command<AuthorizeSession> for Service<Db, St, Idp>
where
    Idp: Identity<
        identity::Verify,
        Ok = identity::Claims,
        Err = Traced<identity::Error>,
    >,
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeSession { token } = cmd;

        let claims = self
            .identity()
            .execute(identity::Verify(token))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existing = self
            .database()
            .execute(Select(By::new(claims.user_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(user) = existing {
            return Ok(user);
        }

        let mut user = User::blank(claims.user_id);
        user.display_name = claims.display_name;
        user.email = claims.email;
        user.photo_url = claims.photo_url;

        self.database()
            .execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`AuthorizeSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`identity::Token`] verification error.
    #[display("Failed to verify the identity token: {_0}")]
    Identity(identity::Error),
}
