//! Cloud-Scribe: upload a local audio file to Cloud Storage and transcribe it
//! with the Speech-to-Text batch API.

mod app;
mod cli;
mod config;
mod error;
mod output_handler;

pub(crate) use {
    app::App,
    cli::Cli,
    error::{AppError, Result as AppResult},
    output_handler::OutputHandler,
};

use crate::config::Config;

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "cloud_scribe=info,cloud_scribe_core=info";

/// Application entry point.
#[tokio::main]
async fn main() -> ExitCode {
    // Stdout carries the transcript, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    cli.apply(&mut config);

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        return ExitCode::FAILURE;
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, cancelling");
                ctrl_c.cancel();
            }
            Err(e) => error!(error = ?e, "Failed to listen for Ctrl-C"),
        }
    });

    let mut app = App::new(config, OutputHandler::stdout());

    match app.run(&cancel).await {
        Ok(transcript) => {
            info!(segments = transcript.segments.len(), "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = ?e, "Transcription failed");
            ExitCode::FAILURE
        }
    }
}
