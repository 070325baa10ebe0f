use crate::{
    CoreResult,
    speech::model::{BatchRecognizeRequest, Operation, Recognizer},
};

use async_trait::async_trait;

/// Remote speech recognition calls used by the transcriber.
///
/// Every method maps to exactly one request; no retries happen here.
#[async_trait]
pub trait SpeechApi: Send + Sync {
    /// Create `recognizer` under `parent` (`projects/{p}/locations/{l}`).
    async fn create_recognizer(
        &self,
        parent: &str,
        recognizer_id: &str,
        recognizer: &Recognizer,
    ) -> CoreResult<Operation>;

    /// Delete the recognizer with full resource name `name`.
    async fn delete_recognizer(&self, name: &str) -> CoreResult<()>;

    /// Submit a batch recognition job against `recognizer`.
    async fn batch_recognize(
        &self,
        recognizer: &str,
        request: &BatchRecognizeRequest,
    ) -> CoreResult<Operation>;

    /// Fetch the current state of operation `name`.
    async fn get_operation(&self, name: &str) -> CoreResult<Operation>;
}
