use crate::{
    speech::{
        OperationPoller, SpeechApi, TranscriptResult,
        model::{
            AutoDetectDecodingConfig, BatchRecognizeFileMetadata, BatchRecognizeRequest,
            BatchRecognizeResponse, BatchRecognizeResults, RecognitionConfig,
            RecognitionOutputConfig, Recognizer,
        },
    },
    storage::{ObjectRef, ObjectStore},
    {CloudError, CoreResult},
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "chirp_2";

/// Language code that asks the service to detect the language.
pub const AUTO_LANGUAGE: &str = "auto";

/// Ceiling for jobs run through a dedicated recognizer.
pub const NAMED_RECOGNIZER_TIMEOUT: Duration = Duration::from_secs(3600);

/// Ceiling for jobs run through the default recognizer.
pub const DEFAULT_RECOGNIZER_TIMEOUT: Duration = Duration::from_secs(600);

/// Pause between operation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Which recognizer a job runs through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerMode {
    /// Create a dedicated recognizer for the job, then clean it up.
    #[default]
    Named,
    /// Use the implicit `recognizers/_` path; nothing to create or delete.
    Default,
}

/// Where the service delivers transcripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRouting {
    /// Results come back in the operation response.
    Inline,
    /// Results are written as JSON under `destination_uri` and read back.
    External {
        /// `gs://` prefix the service writes result files under.
        destination_uri: String,
    },
}

/// When a dedicated recognizer is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Delete after the job, whether it succeeded or not.
    #[default]
    Always,
    /// Delete only after results were read successfully.
    OnSuccess,
    /// Leave the recognizer in place.
    Never,
}

/// Parameters for one transcription job.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Dedicated or default recognizer.
    pub recognizer: RecognizerMode,
    /// Inline or external result delivery.
    pub output: OutputRouting,
    /// Recognition model identifier.
    pub model: String,
    /// Candidate language codes; `["auto"]` enables detection.
    pub language_codes: Vec<String>,
    /// Ceiling for each operation wait.
    pub timeout: Duration,
    /// Pause between polls.
    pub poll_interval: Duration,
    /// Recognizer cleanup behaviour (named mode only).
    pub cleanup: CleanupPolicy,
}

impl TranscribeOptions {
    /// Dedicated recognizer, inline results, one hour ceiling.
    pub fn named_recognizer() -> Self {
        Self {
            recognizer: RecognizerMode::Named,
            output: OutputRouting::Inline,
            model: DEFAULT_MODEL.to_string(),
            language_codes: vec![AUTO_LANGUAGE.to_string()],
            timeout: NAMED_RECOGNIZER_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cleanup: CleanupPolicy::Always,
        }
    }

    /// Default recognizer, inline results, ten minute ceiling.
    pub fn default_recognizer() -> Self {
        Self {
            recognizer: RecognizerMode::Default,
            timeout: DEFAULT_RECOGNIZER_TIMEOUT,
            ..Self::named_recognizer()
        }
    }

    fn poller(&self) -> OperationPoller {
        OperationPoller::new(self.timeout, self.poll_interval)
    }

    fn recognition_config(&self) -> RecognitionConfig {
        RecognitionConfig {
            model: Some(self.model.clone()),
            language_codes: self.language_codes.clone(),
            auto_decoding_config: Some(AutoDetectDecodingConfig {}),
        }
    }
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self::named_recognizer()
    }
}

/// Runs batch recognition jobs for objects already in storage.
pub struct Transcriber {
    speech: Arc<dyn SpeechApi>,
    store: Arc<dyn ObjectStore>,
    project_id: String,
    location: String,
}

impl Transcriber {
    /// Create a transcriber scoped to `projects/{project_id}/locations/{location}`.
    pub fn new(
        speech: Arc<dyn SpeechApi>,
        store: Arc<dyn ObjectStore>,
        project_id: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            speech,
            store,
            project_id: project_id.into(),
            location: location.into(),
        }
    }

    /// `projects/{project}/locations/{location}`.
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    /// Resource path of the implicit default recognizer.
    pub fn default_recognizer_name(&self) -> String {
        format!("{}/recognizers/_", self.parent())
    }

    /// Transcribe `audio` and return its segments.
    ///
    /// Fails with `ObjectNotFound` before anything is submitted if the object
    /// is missing. In named mode the dedicated recognizer is cleaned up
    /// according to `options.cleanup`; a failed deletion is logged and does
    /// not replace the job's own outcome.
    #[instrument(skip(self, options, cancel), fields(audio = %audio, mode = ?options.recognizer))]
    pub async fn transcribe(
        &self,
        audio: &ObjectRef,
        options: &TranscribeOptions,
        cancel: &CancellationToken,
    ) -> CoreResult<TranscriptResult> {
        if !self.store.object_exists(audio).await? {
            return Err(CloudError::ObjectNotFound {
                uri: audio.uri(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let recognizer = match options.recognizer {
            RecognizerMode::Named => self.create_recognizer(options, cancel).await?,
            RecognizerMode::Default => self.default_recognizer_name(),
        };

        let outcome = self.recognize(&recognizer, audio, options, cancel).await;

        if options.recognizer == RecognizerMode::Named {
            self.cleanup(&recognizer, options.cleanup, outcome.is_ok()).await;
        }

        outcome
    }

    /// Create the dedicated recognizer and wait until it is usable.
    ///
    /// Once the create request is accepted the recognizer may exist even if
    /// the wait fails, so a failed wait runs cleanup before returning.
    #[instrument(skip(self, options, cancel))]
    async fn create_recognizer(
        &self,
        options: &TranscribeOptions,
        cancel: &CancellationToken,
    ) -> CoreResult<String> {
        let parent = self.parent();
        let recognizer_id = format!("scribe-{}", Uuid::new_v4().simple());
        let requested_name = format!("{parent}/recognizers/{recognizer_id}");
        let recognizer = Recognizer {
            name: String::new(),
            default_recognition_config: Some(options.recognition_config()),
        };

        let operation = self
            .speech
            .create_recognizer(&parent, &recognizer_id, &recognizer)
            .await?;

        let created: Recognizer = match options
            .poller()
            .wait(self.speech.as_ref(), operation, cancel)
            .await
        {
            Ok(created) => created,
            Err(e) => {
                self.cleanup(&requested_name, options.cleanup, false).await;
                return Err(Self::creation_error(e));
            }
        };

        let name = if created.name.is_empty() {
            requested_name
        } else {
            created.name
        };

        info!(recognizer = %name, model = %options.model, "Recognizer created");

        Ok(name)
    }

    /// Failures reported by the create operation name the recognizer;
    /// timeouts and cancellation keep their own kind.
    #[track_caller]
    fn creation_error(error: CloudError) -> CloudError {
        match error {
            CloudError::OperationFailed { message, .. } => CloudError::RecognizerCreationFailed {
                reason: message,
                location: ErrorLocation::from(Location::caller()),
            },
            CloudError::ResultParseFailed { source, .. } => CloudError::RecognizerCreationFailed {
                reason: format!("unreadable recognizer in create response: {source}"),
                location: ErrorLocation::from(Location::caller()),
            },
            other => other,
        }
    }

    async fn cleanup(&self, recognizer: &str, policy: CleanupPolicy, succeeded: bool) {
        let delete = match policy {
            CleanupPolicy::Always => true,
            CleanupPolicy::OnSuccess => succeeded,
            CleanupPolicy::Never => false,
        };

        if delete {
            self.delete_recognizer(recognizer).await;
        } else {
            info!(recognizer = %recognizer, "Recognizer left in place");
        }
    }

    async fn delete_recognizer(&self, name: &str) {
        match self.speech.delete_recognizer(name).await {
            Ok(()) => info!(recognizer = %name, "Recognizer deleted"),
            Err(e) => warn!(recognizer = %name, error = ?e, "Failed to delete recognizer"),
        }
    }

    #[instrument(skip(self, audio, options, cancel))]
    async fn recognize(
        &self,
        recognizer: &str,
        audio: &ObjectRef,
        options: &TranscribeOptions,
        cancel: &CancellationToken,
    ) -> CoreResult<TranscriptResult> {
        // A dedicated recognizer already carries model and languages.
        let config = match options.recognizer {
            RecognizerMode::Named => RecognitionConfig {
                auto_decoding_config: Some(AutoDetectDecodingConfig {}),
                ..RecognitionConfig::default()
            },
            RecognizerMode::Default => options.recognition_config(),
        };

        let recognition_output_config = match &options.output {
            OutputRouting::Inline => RecognitionOutputConfig::inline(),
            OutputRouting::External { destination_uri } => {
                RecognitionOutputConfig::gcs(destination_uri.clone())
            }
        };

        let request = BatchRecognizeRequest {
            config,
            files: vec![BatchRecognizeFileMetadata { uri: audio.uri() }],
            recognition_output_config,
        };

        let operation = self.speech.batch_recognize(recognizer, &request).await?;

        info!(
            operation = %operation.name,
            timeout_secs = options.timeout.as_secs(),
            "Batch recognition submitted, waiting for completion"
        );

        let response: BatchRecognizeResponse = options
            .poller()
            .wait(self.speech.as_ref(), operation, cancel)
            .await?;

        self.extract(audio, response).await
    }

    async fn extract(
        &self,
        audio: &ObjectRef,
        mut response: BatchRecognizeResponse,
    ) -> CoreResult<TranscriptResult> {
        let uri = audio.uri();

        let Some(file_result) = response.results.remove(&uri) else {
            return Err(CloudError::ResultMissing {
                uri,
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if let Some(status) = file_result.error.filter(|s| s.is_error()) {
            return Err(CloudError::FileRecognitionFailed {
                uri,
                code: status.code,
                message: status.message,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let inline = file_result
            .inline_result
            .and_then(|r| r.transcript)
            .or(file_result.transcript);

        let results = match (inline, file_result.cloud_storage_result) {
            (Some(results), _) => results,
            (None, Some(stored)) => self.read_stored_results(&stored.uri).await?,
            (None, None) => {
                return Err(CloudError::ResultMissing {
                    uri,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let transcript = TranscriptResult::from_results(uri, results);

        debug!(segments = transcript.segments.len(), "Transcript extracted");

        Ok(transcript)
    }

    async fn read_stored_results(&self, result_uri: &str) -> CoreResult<BatchRecognizeResults> {
        let object = ObjectRef::parse_uri(result_uri)?;
        let bytes = self.store.read_object(&object).await?;

        serde_json::from_slice(&bytes).map_err(|e| CloudError::ResultParseFailed {
            what: result_uri.to_string(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
