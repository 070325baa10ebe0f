use crate::{
    AppError, AppResult,
    config::{
        default_language_codes, default_model, default_poll_interval_ms,
        default_show_detected_language,
    },
};

use std::{panic::Location, time::Duration};

use cloud_scribe_core::{CleanupPolicy, OutputRouting, RecognizerMode, TranscribeOptions};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Where recognition results are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// In the operation response.
    #[default]
    Inline,
    /// As JSON objects under `output_uri`.
    External,
}

/// Recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// `named` creates a recognizer per job, `default` uses `recognizers/_`.
    #[serde(default)]
    pub recognizer: RecognizerMode,

    /// Recognition model, e.g. `chirp_2`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Candidate languages; `["auto"]` enables detection.
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,

    /// Inline or external result delivery.
    #[serde(default)]
    pub output: OutputKind,

    /// `gs://` prefix for external results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_uri: Option<String>,

    /// Operation ceiling. Defaults to 3600 for named and 600 for default mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Pause between operation polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// When a named recognizer is deleted.
    #[serde(default)]
    pub cleanup: CleanupPolicy,

    /// Print `Detected language:` after each segment.
    #[serde(default = "default_show_detected_language")]
    pub show_detected_language: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            recognizer: RecognizerMode::default(),
            model: default_model(),
            language_codes: default_language_codes(),
            output: OutputKind::default(),
            output_uri: None,
            timeout_secs: None,
            poll_interval_ms: default_poll_interval_ms(),
            cleanup: CleanupPolicy::default(),
            show_detected_language: default_show_detected_language(),
        }
    }
}

impl TranscriptionConfig {
    /// Build job options, rejecting settings the service would refuse.
    #[track_caller]
    pub fn to_options(&self) -> AppResult<TranscribeOptions> {
        let preset = match self.recognizer {
            RecognizerMode::Named => TranscribeOptions::named_recognizer(),
            RecognizerMode::Default => TranscribeOptions::default_recognizer(),
        };

        if self.model.trim().is_empty() {
            return Err(Self::invalid("model must not be empty"));
        }

        if self.language_codes.iter().all(|code| code.trim().is_empty()) {
            return Err(Self::invalid("language_codes must name at least one language"));
        }

        if self.poll_interval_ms == 0 {
            return Err(Self::invalid("poll_interval_ms must be greater than zero"));
        }

        if self.timeout_secs == Some(0) {
            return Err(Self::invalid("timeout_secs must be greater than zero"));
        }

        let output = match self.output {
            OutputKind::Inline => OutputRouting::Inline,
            OutputKind::External => {
                let Some(uri) = self.output_uri.as_deref().filter(|u| !u.trim().is_empty())
                else {
                    return Err(Self::invalid("output = \"external\" requires output_uri"));
                };

                // A bare bucket is a valid prefix, so only the scheme is checked.
                if uri.strip_prefix("gs://").is_none_or(str::is_empty) {
                    return Err(Self::invalid(&format!(
                        "output_uri must be a gs:// URI, got {}",
                        uri
                    )));
                }

                OutputRouting::External {
                    destination_uri: uri.to_string(),
                }
            }
        };

        Ok(TranscribeOptions {
            recognizer: self.recognizer,
            output,
            model: self.model.clone(),
            language_codes: self
                .language_codes
                .iter()
                .filter(|code| !code.trim().is_empty())
                .cloned()
                .collect(),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(preset.timeout),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            cleanup: self.cleanup,
        })
    }

    #[track_caller]
    fn invalid(reason: &str) -> AppError {
        AppError::ConfigError {
            reason: format!("[transcription] {}", reason),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
