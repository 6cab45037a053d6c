//! Identity provider implementations.

use std::{collections::HashMap, sync::Arc};

use derive_more::{AsRef, Debug, Display, Error as StdError, From};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::domain::user;

/// Identity provider operation.
pub use common::Handler as Identity;

/// URL the identity token signing keys are published at.
const JWKS_URL: &str = "https://www.googleapis.com/service_accounts/v1/jwk/\
                        securetoken@system.gserviceaccount.com";

/// [`GoogleIdentity`] configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// ID of the Google Cloud project issuing the tokens.
    pub project_id: String,
}

/// Bearer token issued by the identity provider.
#[derive(AsRef, Clone, Debug, From)]
#[as_ref(forward)]
pub struct Token(#[debug(skip)] String);

/// Claims verified out of a [`Token`].
#[derive(Clone, Debug)]
pub struct Claims {
    /// ID of the [`User`] the [`Token`] was issued to.
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// Email the [`User`] signed in with, if any.
    ///
    /// [`User`]: crate::domain::User
    pub email: Option<user::Email>,

    /// Display name reported by the provider, if any.
    pub display_name: Option<user::DisplayName>,

    /// Avatar URL reported by the provider, if any.
    pub photo_url: Option<user::PhotoUrl>,
}

/// Operation of verifying a [`Token`].
#[derive(Clone, Debug)]
pub struct Verify(pub Token);

/// Raw JWT claims of an identity [`Token`].
#[derive(Debug, Deserialize)]
struct RawClaims {
    /// Subject: the user ID.
    sub: String,

    /// Email of the user, if any.
    #[serde(default)]
    email: Option<String>,

    /// Display name of the user, if any.
    #[serde(default)]
    name: Option<String>,

    /// Avatar URL of the user, if any.
    #[serde(default)]
    picture: Option<String>,
}

/// Set of JSON Web Keys.
#[derive(Debug, Deserialize)]
struct Jwks {
    /// Keys of this set.
    keys: Vec<Jwk>,
}

/// Single RSA JSON Web Key.
#[derive(Debug, Deserialize)]
struct Jwk {
    /// ID of this key.
    kid: String,

    /// RSA modulus, base64url-encoded.
    n: String,

    /// RSA exponent, base64url-encoded.
    e: String,
}

/// [`Identity`] provider verifying Google-issued tokens.
///
/// Signing keys are fetched from the provider's JWKS endpoint and cached
/// until a token arrives with an unknown key ID, which triggers a refresh
/// (keys rotate on the provider side).
#[derive(Clone, Debug)]
pub struct GoogleIdentity {
    /// HTTP client the signing keys are fetched with.
    http: reqwest::Client,

    /// Static configuration.
    config: Arc<Config>,

    /// Cached signing keys, by key ID.
    #[debug(skip)]
    keys: Arc<RwLock<HashMap<String, DecodingKey>>>,
}

impl GoogleIdentity {
    /// Creates a new [`GoogleIdentity`] with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
            keys: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolves the signing key with the given `kid`, refreshing the cache
    /// on a miss.
    async fn key(&self, kid: &str) -> Result<DecodingKey, Traced<Error>> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }

        let jwks: Jwks = self
            .http
            .get(JWKS_URL)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(tracerr::from_and_wrap!(=> Error))?
            .json()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let mut keys = self.keys.write().await;
        keys.clear();
        for jwk in jwks.keys {
            let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
                .map_err(tracerr::from_and_wrap!(=> Error))?;
            _ = keys.insert(jwk.kid, key);
        }
        keys.get(kid)
            .cloned()
            .ok_or_else(|| tracerr::new!(Error::UnknownKeyId))
    }
}

impl Identity<Verify> for GoogleIdentity {
    type Ok = Claims;
    type Err = Traced<Error>;

    async fn execute(&self, Verify(token): Verify) -> Result<Self::Ok, Self::Err> {
        let header = jsonwebtoken::decode_header(token.as_ref())
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let kid =
            header.kid.ok_or_else(|| tracerr::new!(Error::UnknownKeyId))?;
        let key = self.key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.config.project_id,
        )]);

        let claims = jsonwebtoken::decode::<RawClaims>(
            token.as_ref(),
            &key,
            &validation,
        )
        .map_err(tracerr::from_and_wrap!(=> Error))?
        .claims;

        Ok(Claims {
            user_id: user::Id::new(claims.sub)
                .ok_or_else(|| tracerr::new!(Error::InvalidSubject))?,
            email: claims.email.and_then(user::Email::new),
            display_name: claims.name.and_then(user::DisplayName::new),
            photo_url: claims.picture.and_then(user::PhotoUrl::new),
        })
    }
}

/// [`GoogleIdentity`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Error of fetching the signing keys.
    #[display("Failed to fetch the signing keys: {_0}")]
    Http(reqwest::Error),

    /// JSON Web Token error.
    #[display("Failed to verify the JSON Web Token: {_0}")]
    Jwt(jsonwebtoken::errors::Error),

    /// [`Token`] signed with a key the provider does not publish.
    #[display("Token is signed with an unknown key")]
    UnknownKeyId,

    /// [`Token`] subject that is not a valid user ID.
    #[display("Token subject is not a valid user ID")]
    InvalidSubject,
}
