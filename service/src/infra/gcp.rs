//! Google Cloud authentication plumbing shared by infrastructure clients.

use std::{io, path::Path};

/// Service account OAuth 2.0 authenticator.
pub(crate) type Authenticator = yup_oauth2::authenticator::Authenticator<
    hyper_rustls::HttpsConnector<hyper::client::HttpConnector>,
>;

/// OAuth 2.0 scope covering both the Firestore and the Cloud Storage REST
/// APIs.
pub(crate) const SCOPE: &str =
    "https://www.googleapis.com/auth/cloud-platform";

/// Builds an [`Authenticator`] from the service account key JSON file at the
/// provided `path`.
pub(crate) async fn service_account(
    path: &Path,
) -> Result<Authenticator, io::Error> {
    let key = yup_oauth2::read_service_account_key(path).await?;
    yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
}
