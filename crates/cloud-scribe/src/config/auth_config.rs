use crate::{
    AppError, AppResult,
    config::{ENV_ACCESS_TOKEN, ENV_APPLICATION_CREDENTIALS},
};

use std::{fmt, panic::Location, path::PathBuf};

use cloud_scribe_core::Credentials;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How API requests are authorized.
///
/// Values in the file win over the environment. With neither set the run
/// fails before anything is uploaded.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to a service-account key file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,

    /// Pre-issued OAuth2 access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("credentials_path", &self.credentials_path)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthConfig {
    /// Resolve credentials from this section, then from the process environment.
    #[track_caller]
    pub fn credentials(&self) -> AppResult<Credentials> {
        self.credentials_with_env(|name| std::env::var(name).ok())
    }

    /// Resolve credentials using `env` to look up environment variables.
    ///
    /// Order: `access_token`, `credentials_path`, `GOOGLE_ACCESS_TOKEN`,
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    #[track_caller]
    pub fn credentials_with_env<F>(&self, env: F) -> AppResult<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(self.access_token.clone()) {
            debug!("Using access token from config");
            return Ok(Credentials::AccessToken(token));
        }

        if let Some(path) = &self.credentials_path {
            debug!(credentials_path = ?path, "Using service account key from config");
            return Ok(Credentials::from_service_account_file(path)?);
        }

        if let Some(token) = non_empty(env(ENV_ACCESS_TOKEN)) {
            debug!("Using access token from {}", ENV_ACCESS_TOKEN);
            return Ok(Credentials::AccessToken(token));
        }

        if let Some(path) = non_empty(env(ENV_APPLICATION_CREDENTIALS)) {
            debug!(credentials_path = %path, "Using service account key from {}", ENV_APPLICATION_CREDENTIALS);
            return Ok(Credentials::from_service_account_file(path)?);
        }

        Err(AppError::ConfigError {
            reason: format!(
                "No credentials configured. Set [auth] access_token or credentials_path, or {} / {}",
                ENV_ACCESS_TOKEN, ENV_APPLICATION_CREDENTIALS
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
