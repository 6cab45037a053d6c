//! Firestore [`Database`] implementation.

mod batch;
mod impls;
pub mod value;

use std::{io, path::PathBuf, sync::Arc};

use derive_more::{Debug, Display, Error as StdError, From};
use serde::Deserialize;
use tracerr::Traced;

use crate::infra::{database, gcp};
#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    batch::Batch,
    value::{Document, Value, Write},
};

use self::value::{CommitRequest, ListResponse};

/// [`Firestore`] configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// ID of the Google Cloud project.
    pub project_id: String,

    /// Path to the service account key JSON file.
    pub credentials_file: PathBuf,

    /// Name of the Firestore database.
    #[serde(default = "Config::default_database")]
    pub database: String,
}

impl Config {
    /// Returns the default [`Config::database`] name.
    fn default_database() -> String {
        "(default)".into()
    }
}

/// Firestore [`Database`] client, speaking the REST API.
#[derive(Clone, Debug)]
pub struct Firestore {
    /// HTTP client requests are made with.
    http: reqwest::Client,

    /// OAuth 2.0 authenticator minting access tokens.
    #[debug(skip)]
    auth: Arc<gcp::Authenticator>,

    /// Static configuration.
    config: Arc<Config>,
}

impl Firestore {
    /// Creates a new [`Firestore`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the service account credentials cannot be loaded.
    pub async fn new(config: Config) -> Result<Self, Traced<database::Error>> {
        let auth = gcp::service_account(&config.credentials_file)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            http: reqwest::Client::new(),
            auth: Arc::new(auth),
            config: Arc::new(config),
        })
    }

    /// Returns the resource name of the documents root:
    /// `projects/{project}/databases/{database}/documents`.
    fn root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database,
        )
    }

    /// Returns the full resource name of the document (or collection) at the
    /// given `relative` path.
    pub(super) fn document_name(&self, relative: &str) -> String {
        format!("{}/{relative}", self.root())
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

    /// Lists every [`Document`] of the collection at the given `relative`
    /// path, paging through the API until exhausted.
    pub(super) async fn list_all(
        &self,
        relative: &str,
    ) -> Result<Vec<Document>, Traced<Error>> {
        /// Page size requested from the API.
        const PAGE_SIZE: u32 = 300;

        let token = self.token().await?;
        let url = format!(
            "https://firestore.googleapis.com/v1/{}",
            self.document_name(relative),
        );

        let mut documents = vec![];
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(t) = &page_token {
                request = request.query(&[("pageToken", t.as_str())]);
            }

            let response = request
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

            let page: ListResponse = response
                .json()
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))?;
            documents.extend(page.documents);
            page_token = page.next_page_token;
            if page_token.is_none() {
                return Ok(documents);
            }
        }
    }

    /// Fetches the [`Document`] at the given `relative` path.
    ///
    /// Resolves into [`None`] if the document does not exist.
    pub(super) async fn get(
        &self,
        relative: &str,
    ) -> Result<Option<Document>, Traced<Error>> {
        let token = self.token().await?;
        let url = format!(
            "https://firestore.googleapis.com/v1/{}",
            self.document_name(relative),
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(tracerr::new!(Error::Api {
                status: status.as_u16(),
                message,
            }));
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Applies the given [`Write`]s atomically via a `documents:commit`
    /// request.
    pub(super) async fn commit(
        &self,
        writes: Vec<Write>,
    ) -> Result<(), Traced<Error>> {
        if writes.is_empty() {
            return Ok(());
        }

        let token = self.token().await?;
        let url = format!(
            "https://firestore.googleapis.com/v1/{}:commit",
            self.root(),
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&CommitRequest { writes })
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
        Ok(())
    }
}

/// [`Firestore`] database [`Error`].
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

    /// Unsuccessful Firestore API response.
    #[display("Firestore API responded with status {status}: {message}")]
    #[from(ignore)]
    Api {
        /// HTTP status code of the response.
        status: u16,

        /// Body of the response.
        #[error(not(source))]
        message: String,
    },

    /// [`Document`] that cannot be decoded into its domain entity.
    #[display("Malformed `{_0}` document")]
    #[from(ignore)]
    Malformed(#[error(not(source))] &'static str),
}
