use serde::{Deserialize, Serialize};

/// Service endpoint overrides, mainly for emulators and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL of the storage JSON API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    /// Base URL of the speech API. Defaults to the host serving the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,

    /// OAuth2 token endpoint used for service-account exchanges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
