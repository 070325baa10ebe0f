use crate::{CloudError, CoreResult};

use std::{fmt, panic::Location, path::Path};

use error_location::ErrorLocation;
use serde::Deserialize;

/// Default OAuth2 token endpoint for service-account keys that omit one.
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The subset of a service-account key file needed for the JWT bearer grant.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email, used as the JWT issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Token endpoint the signed assertion is exchanged at.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// How requests to the storage and speech APIs are authorized.
#[derive(Clone)]
pub enum Credentials {
    /// A pre-issued OAuth2 access token, used as-is.
    AccessToken(String),
    /// A service-account key, exchanged for short-lived access tokens.
    ServiceAccount(ServiceAccountKey),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
            Credentials::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
        }
    }
}

impl Credentials {
    /// Parse a service-account key from its JSON contents.
    #[track_caller]
    pub fn from_service_account_json(json: &str) -> CoreResult<Self> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| CloudError::AuthFailed {
                reason: format!("Invalid service account JSON: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Credentials::ServiceAccount(key))
    }

    /// Read and parse a service-account key file.
    #[track_caller]
    pub fn from_service_account_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| CloudError::AuthFailed {
            reason: format!("Failed to read credentials file {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::from_service_account_json(&contents)
    }
}
