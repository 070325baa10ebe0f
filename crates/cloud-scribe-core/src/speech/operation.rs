use crate::{
    speech::{SpeechApi, model::Operation},
    {CloudError, CoreResult},
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a long-running remote operation as seen by the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    /// Submission returned a handle; no poll has happened yet.
    Submitted,
    /// At least one poll has been issued and the operation is still running.
    Polling,
    /// Finished with a response.
    Completed,
    /// Ceiling reached before the operation finished.
    TimedOut,
    /// Finished with an error, or a poll request failed.
    Failed,
    /// Caller cancelled the wait.
    Cancelled,
}

impl OperationState {
    /// Whether no further transitions can happen.
    pub fn is_terminal(self) -> bool {
        !matches!(self, OperationState::Submitted | OperationState::Polling)
    }
}

/// Waits on operation handles with a fixed interval and ceiling.
///
/// Both the sleep between polls and each poll request are bounded by the
/// time left before the ceiling, so a wait never outlives `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct OperationPoller {
    timeout: Duration,
    interval: Duration,
}

impl OperationPoller {
    /// Poll every `interval`, giving up after `timeout`.
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Poll `operation` until it finishes and decode its response as `T`.
    ///
    /// # Errors
    ///
    /// `OperationFailed` if the operation reports an error or a poll request
    /// fails, `OperationTimedOut` once the ceiling passes,
    /// `OperationCancelled` if `cancel` fires, `ResultParseFailed` if the
    /// response does not decode.
    #[instrument(skip(self, api, operation, cancel), fields(operation = %operation.name))]
    pub async fn wait<T: DeserializeOwned>(
        &self,
        api: &dyn SpeechApi,
        operation: Operation,
        cancel: &CancellationToken,
    ) -> CoreResult<T> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut operation = operation;
        let mut state = OperationState::Submitted;
        let mut polls: u32 = 0;

        loop {
            if operation.done {
                let result = Self::finish(operation);
                state = if result.is_ok() {
                    OperationState::Completed
                } else {
                    OperationState::Failed
                };
                info!(
                    ?state,
                    polls,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Operation finished"
                );
                return result;
            }

            let pause = self.interval.min(deadline.saturating_duration_since(Instant::now()));
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Self::cancelled(&operation.name)),
                _ = tokio::time::sleep(pause) => {}
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Self::timed_out(&operation.name, started));
            }

            if state == OperationState::Submitted {
                state = OperationState::Polling;
                debug!(?state, "Polling started");
            }

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Self::cancelled(&operation.name)),
                fetched = tokio::time::timeout(remaining, api.get_operation(&operation.name)) => fetched,
            };

            polls += 1;
            operation = match fetched {
                Ok(result) => result?,
                Err(_) => return Err(Self::timed_out(&operation.name, started)),
            };
        }
    }

    #[track_caller]
    fn finish<T: DeserializeOwned>(operation: Operation) -> CoreResult<T> {
        if let Some(status) = operation.error.filter(|s| s.is_error()) {
            return Err(CloudError::OperationFailed {
                operation: operation.name,
                code: status.code,
                message: status.message,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let Some(response) = operation.response else {
            return Err(CloudError::OperationFailed {
                operation: operation.name,
                code: 0,
                message: "operation finished without a response".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        serde_json::from_value(response).map_err(|e| CloudError::ResultParseFailed {
            what: format!("response of {}", operation.name),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn timed_out(name: &str, started: Instant) -> CloudError {
        let waited = started.elapsed();
        warn!(
            state = ?OperationState::TimedOut,
            waited_ms = waited.as_millis(),
            "Operation did not finish in time"
        );
        CloudError::OperationTimedOut {
            operation: name.to_string(),
            waited_secs: waited.as_secs(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    fn cancelled(name: &str) -> CloudError {
        info!(state = ?OperationState::Cancelled, "Operation wait cancelled");
        CloudError::OperationCancelled {
            operation: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
