use crate::{AppResult, OutputHandler, config::Config};

use std::{io::Write, sync::Arc};

use cloud_scribe_core::{
    GcsClient, SpeechClient, TokenSource, Transcriber, TranscriptResult, Uploader,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// One upload-then-transcribe run.
pub struct App<W: Write> {
    pub(crate) config: Config,
    pub(crate) output: OutputHandler<W>,
}

impl<W: Write> App<W> {
    /// Create a run for a validated configuration.
    pub fn new(config: Config, output: OutputHandler<W>) -> Self {
        Self { config, output }
    }

    /// Upload the source file, transcribe it, and print the transcript.
    ///
    /// Stops with `OperationCancelled` once `cancel` fires.
    #[instrument(skip(self, cancel), fields(
        project = %self.config.gcp.project_id,
        bucket = %self.config.storage.bucket,
        key = %self.config.job.destination_key,
    ))]
    pub async fn run(&mut self, cancel: &CancellationToken) -> AppResult<TranscriptResult> {
        let options = self.config.transcription.to_options()?;
        let endpoints = &self.config.endpoints;

        let mut tokens = TokenSource::new(self.config.auth.credentials()?);
        if let Some(token_uri) = &endpoints.token {
            tokens = tokens.with_token_uri(token_uri.clone());
        }
        let tokens = Arc::new(tokens);

        let store = Arc::new(match &endpoints.storage {
            Some(endpoint) => GcsClient::with_endpoint(Arc::clone(&tokens), endpoint)?,
            None => GcsClient::new(Arc::clone(&tokens))?,
        });

        let speech = Arc::new(match &endpoints.speech {
            Some(endpoint) => SpeechClient::with_endpoint(tokens, endpoint)?,
            None => SpeechClient::new(tokens, &self.config.gcp.location)?,
        });

        let audio = Uploader::new(store.clone())
            .upload_file(
                &self.config.storage.bucket,
                &self.config.job.source_file,
                &self.config.job.destination_key,
            )
            .await?;

        self.output
            .uploaded(&self.config.job.source_file, &self.config.job.destination_key)?;
        self.output.waiting()?;

        let transcriber = Transcriber::new(
            speech,
            store,
            self.config.gcp.project_id.clone(),
            self.config.gcp.location.clone(),
        );

        let transcript = transcriber.transcribe(&audio, &options, cancel).await?;

        info!(
            audio = %transcript.audio_uri,
            segments = transcript.segments.len(),
            "Transcription complete"
        );

        self.output
            .transcript(&transcript, self.config.transcription.show_detected_language)?;

        Ok(transcript)
    }
}
