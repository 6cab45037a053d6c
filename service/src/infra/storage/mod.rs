//! Object [`Storage`] implementations.

use std::{io, path::PathBuf, sync::Arc};

use common::operations::Perform;
use derive_more::{Debug, Display, Error as StdError, From};
use serde::Deserialize;
use tracerr::Traced;

use crate::{domain::user, infra::gcp};

/// Object storage operation.
pub use common::Handler as Storage;

/// [`CloudStorage`] configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Name of the bucket uploads land in.
    pub bucket: String,

    /// Path to the service account key JSON file.
    pub credentials_file: PathBuf,
}

/// Operation of uploading a [`User`] profile photo.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct UploadProfilePhoto {
    /// [`User`] the photo belongs to, keyed into the object path.
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// Original file name of the image.
    pub file_name: String,

    /// MIME type of the image.
    pub content_type: String,

    /// Raw image bytes.
    #[debug(skip)]
    pub bytes: Vec<u8>,
}

/// Google Cloud [`Storage`] client, speaking the JSON API.
#[derive(Clone, Debug)]
pub struct CloudStorage {
    /// HTTP client uploads are made with.
    http: reqwest::Client,

    /// OAuth 2.0 authenticator minting access tokens.
    #[debug(skip)]
    auth: Arc<gcp::Authenticator>,

    /// Static configuration.
    config: Arc<Config>,
}

impl CloudStorage {
    /// Creates a new [`CloudStorage`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the service account credentials cannot be loaded.
    pub async fn new(config: Config) -> Result<Self, Traced<Error>> {
        let auth = gcp::service_account(&config.credentials_file)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        Ok(Self {
            http: reqwest::Client::new(),
            auth: Arc::new(auth),
            config: Arc::new(config),
        })
    }

    /// Mints an access token for a single API request.
    async fn token(&self) -> Result<String, Traced<Error>> {
        let token = self
            .auth
            .token(&[gcp::SCOPE])
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        token
            .token()
            .map(ToOwned::to_owned)
            .ok_or_else(|| tracerr::new!(Error::NoAccessToken))
    }
}

impl Storage<Perform<UploadProfilePhoto>> for CloudStorage {
    type Ok = user::PhotoUrl;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(upload): Perform<UploadProfilePhoto>,
    ) -> Result<Self::Ok, Self::Err> {
        let UploadProfilePhoto {
            user_id,
            file_name,
            content_type,
            bytes,
        } = upload;

        let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos()
            / 1_000_000;
        let object = format!(
            "profileImages/{user_id}/{millis}-{}",
            file_name.replace('/', "_"),
        );

        let token = self.token().await?;
        let url = format!(
            "https://storage.googleapis.com/upload/storage/v1/b/{}/o",
            self.config.bucket,
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .query(&[
                ("uploadType", "media"),
                ("name", object.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(tracerr::new!(Error::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let encoded = urlencoding::encode(&object).into_owned();
        user::PhotoUrl::new(format!(
            "https://storage.googleapis.com/{}/{encoded}",
            self.config.bucket,
        ))
        .ok_or_else(|| tracerr::new!(Error::InvalidObjectName))
    }
}

/// [`CloudStorage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Error of loading the service account credentials.
    #[display("Failed to load service account credentials: {_0}")]
    Credentials(io::Error),

    /// Error of obtaining an OAuth 2.0 access token.
    #[display("Failed to obtain an access token: {_0}")]
    Auth(yup_oauth2::Error),

    /// OAuth 2.0 response carrying no access token.
    #[display("OAuth 2.0 response carries no access token")]
    NoAccessToken,

    /// HTTP transport error.
    #[display("HTTP request failed: {_0}")]
    Http(reqwest::Error),

    /// Unsuccessful Cloud Storage API response.
    #[display("Cloud Storage API responded with status {status}: {message}")]
    #[from(ignore)]
    Api {
        /// HTTP status code of the response.
        status: u16,

        /// Body of the response.
        #[error(not(source))]
        message: String,
    },

    /// Object name that does not form a valid download URL.
    #[display("Object name does not form a valid download URL")]
    InvalidObjectName,
}
