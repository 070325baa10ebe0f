mod auth_config;
#[allow(clippy::module_inception)]
mod config;
mod endpoints_config;
mod gcp_config;
mod job_config;
mod storage_config;
mod transcription_config;

pub(crate) use {
    auth_config::AuthConfig, config::Config, endpoints_config::EndpointsConfig,
    gcp_config::GcpConfig, job_config::JobConfig, storage_config::StorageConfig,
    transcription_config::{OutputKind, TranscriptionConfig},
};

use cloud_scribe_core::{AUTO_LANGUAGE, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL};

pub(crate) const DEFAULT_LOCATION: &str = "global";
pub(crate) const DEFAULT_SOURCE_FILE: &str = "sample.mp3";
pub(crate) const DEFAULT_DESTINATION_KEY: &str = "audio/sample.wav";
pub(crate) const DEFAULT_SHOW_DETECTED_LANGUAGE: bool = true;

/// Written into new config files; a config still holding them does not validate.
pub(crate) const PLACEHOLDER_PROJECT_ID: &str = "your-project-id";
pub(crate) const PLACEHOLDER_BUCKET: &str = "your-bucket";

pub(crate) const ENV_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";
pub(crate) const ENV_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

pub(crate) fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

pub(crate) fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

pub(crate) fn default_language_codes() -> Vec<String> {
    vec![AUTO_LANGUAGE.to_string()]
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

pub(crate) fn default_show_detected_language() -> bool {
    DEFAULT_SHOW_DETECTED_LANGUAGE
}
