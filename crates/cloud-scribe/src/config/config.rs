//! Configuration management for cloud-scribe.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation before any remote call, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        AuthConfig, DEFAULT_DESTINATION_KEY, DEFAULT_LOCATION, DEFAULT_SOURCE_FILE,
        EndpointsConfig, GcpConfig, JobConfig, PLACEHOLDER_BUCKET, PLACEHOLDER_PROJECT_ID,
        StorageConfig, TranscriptionConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project and location.
    pub gcp: GcpConfig,
    /// Destination bucket.
    pub storage: StorageConfig,
    /// Source file and destination key.
    pub job: JobConfig,
    /// Recognition settings.
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Credentials.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Endpoint overrides.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

impl Config {
    /// Load configuration from `path`, or from the per-user config file.
    ///
    /// An explicit path must exist. When the per-user file is missing a
    /// default one is written; it fails `validate()` until its placeholders
    /// are replaced.
    #[track_caller]
    #[instrument]
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            Self::create_default(&config_path)
        }
    }

    /// Read and parse the TOML file at `path`.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config = Self::parse(&contents)?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Parse configuration from TOML text.
    #[track_caller]
    pub fn parse(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Check everything that can be checked without network access.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        let required = [
            ("gcp.project_id", self.gcp.project_id.as_str(), PLACEHOLDER_PROJECT_ID),
            ("storage.bucket", self.storage.bucket.as_str(), PLACEHOLDER_BUCKET),
        ];

        for (field, value, placeholder) in required {
            if value.trim().is_empty() || value == placeholder {
                return Err(AppError::ConfigError {
                    reason: format!("{} is not set. Edit the config file or pass it on the command line.", field),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        if self.gcp.location.trim().is_empty() {
            return Err(AppError::ConfigError {
                reason: "gcp.location must not be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.job.destination_key.trim().is_empty() || self.job.destination_key.ends_with('/') {
            return Err(AppError::ConfigError {
                reason: format!(
                    "job.destination_key must name an object, got {:?}",
                    self.job.destination_key
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.transcription.to_options()?;

        debug!("Configuration valid");

        Ok(())
    }

    /// Save configuration to `path` using the atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Configuration written on first run.
    pub fn placeholder() -> Self {
        Self {
            gcp: GcpConfig {
                project_id: PLACEHOLDER_PROJECT_ID.to_string(),
                location: DEFAULT_LOCATION.to_string(),
            },
            storage: StorageConfig {
                bucket: PLACEHOLDER_BUCKET.to_string(),
            },
            job: JobConfig {
                source_file: PathBuf::from(DEFAULT_SOURCE_FILE),
                destination_key: DEFAULT_DESTINATION_KEY.to_string(),
            },
            transcription: TranscriptionConfig::default(),
            auth: AuthConfig::default(),
            endpoints: EndpointsConfig::default(),
        }
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "cloud-scribe", "Cloud-Scribe").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default(config_path: &Path) -> AppResult<Self> {
        let config = Self::placeholder();

        config.save_to(config_path)?;

        warn!(
            config_path = ?config_path,
            "Default config created. Set gcp.project_id and storage.bucket before running."
        );

        Ok(config)
    }
}
