use crate::config::Config;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use cloud_scribe_core::RecognizerMode;

/// Cloud-Scribe: upload an audio file and transcribe it with Speech-to-Text
#[derive(Parser, Debug, Default)]
#[command(name = "cloud-scribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Local audio file to upload
    #[arg(short = 's', long = "source", value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Object key to upload to, e.g. audio/sample.wav
    #[arg(short = 'd', long = "destination", value_name = "KEY")]
    pub destination: Option<String>,

    /// Destination bucket
    #[arg(short = 'b', long = "bucket")]
    pub bucket: Option<String>,

    /// Recognizer to run the job through
    #[arg(long = "recognizer", value_enum)]
    pub recognizer: Option<RecognizerArg>,

    /// Give up waiting after this many seconds
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Command-line spelling of [`RecognizerMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecognizerArg {
    /// Create a dedicated recognizer for the job
    Named,
    /// Use the project's default recognizer
    Default,
}

impl From<RecognizerArg> for RecognizerMode {
    fn from(arg: RecognizerArg) -> Self {
        match arg {
            RecognizerArg::Named => RecognizerMode::Named,
            RecognizerArg::Default => RecognizerMode::Default,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.job.source_file = source.clone();
        }
        if let Some(destination) = &self.destination {
            config.job.destination_key = destination.clone();
        }
        if let Some(bucket) = &self.bucket {
            config.storage.bucket = bucket.clone();
        }
        if let Some(recognizer) = self.recognizer {
            config.transcription.recognizer = recognizer.into();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.transcription.timeout_secs = Some(timeout_secs);
        }
    }
}
