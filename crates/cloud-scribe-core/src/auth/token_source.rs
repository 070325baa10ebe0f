use crate::{
    auth::{Credentials, ServiceAccountKey},
    {CloudError, CoreResult},
};

use std::{
    panic::Location,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Cached tokens are refreshed this long before they expire.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: u64,
    iat: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Produces bearer tokens for outgoing API requests.
///
/// Static access tokens are returned unchanged. Service-account keys are
/// exchanged at the token endpoint and the result is cached until shortly
/// before it expires.
pub struct TokenSource {
    credentials: Credentials,
    http: reqwest::Client,
    token_uri_override: Option<String>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    /// Create a token source for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
            token_uri_override: None,
            cached: Mutex::new(None),
        }
    }

    /// Exchange assertions at `token_uri` instead of the key's own endpoint.
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri_override = Some(token_uri.into());
        self
    }

    /// Return a bearer token, fetching a fresh one if needed.
    #[instrument(skip(self))]
    pub async fn bearer(&self) -> CoreResult<String> {
        let key = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount(key) => key,
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now() + EXPIRY_SKEW
        {
            return Ok(token.access_token.clone());
        }

        let token = self.exchange(key).await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    async fn exchange(&self, key: &ServiceAccountKey) -> CoreResult<CachedToken> {
        let token_uri = self
            .token_uri_override
            .as_deref()
            .unwrap_or(key.token_uri.as_str());

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| CloudError::AuthFailed {
                reason: format!("System clock is before the UNIX epoch: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .as_secs();

        let claims = Claims {
            iss: &key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &key.token_uri,
            exp: now + ASSERTION_LIFETIME_SECS,
            iat: now,
        };

        let encoding_key =
            EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
                CloudError::AuthFailed {
                    reason: format!("Invalid service account private key: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| CloudError::AuthFailed {
                reason: format!("Failed to sign token assertion: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let requested_at = Instant::now();
        let response = self
            .http
            .post(token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::AuthFailed {
                reason: format!("Token endpoint returned {}: {}", status, body),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let token: TokenResponse = response.json().await?;

        debug!(
            client_email = %key.client_email,
            expires_in = token.expires_in,
            "Access token obtained"
        );

        let expires_at = requested_at
            .checked_add(Duration::from_secs(token.expires_in))
            .ok_or_else(|| CloudError::AuthFailed {
                reason: format!("Token endpoint returned unusable expires_in {}", token.expires_in),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}
