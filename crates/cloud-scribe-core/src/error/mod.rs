use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Cloud storage and speech recognition errors with source location tracking.
#[derive(Error, Debug)]
pub enum CloudError {
    /// Local audio file does not exist.
    #[error("Local file not found: {path:?} {location}")]
    LocalFileNotFound {
        /// Path that was requested.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Local audio file exists but could not be read.
    #[error("Failed to read local file {path:?}: {source} {location}")]
    LocalFileRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Object store rejected a write (permissions, quota, bad bucket).
    #[error("Storage write to {uri} failed with status {status}: {body} {location}")]
    StorageWriteFailed {
        /// Target object URI.
        uri: String,
        /// HTTP status returned by the store.
        status: u16,
        /// Response body returned by the store.
        body: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Object store rejected a read.
    #[error("Storage read from {uri} failed with status {status}: {body} {location}")]
    StorageReadFailed {
        /// Source object URI.
        uri: String,
        /// HTTP status returned by the store.
        status: u16,
        /// Response body returned by the store.
        body: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Referenced object is not present in the bucket.
    #[error("Object not found: {uri} {location}")]
    ObjectNotFound {
        /// Object URI that was looked up.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A `gs://` URI could not be parsed into bucket and key.
    #[error("Invalid object URI: {uri} {location}")]
    InvalidObjectUri {
        /// The offending URI.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Service endpoint is not a usable base URL.
    #[error("Invalid endpoint {endpoint}: {reason} {location}")]
    InvalidEndpoint {
        /// The configured endpoint.
        endpoint: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recognizer resource could not be created.
    #[error("Recognizer creation failed: {reason} {location}")]
    RecognizerCreationFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recognizer resource could not be deleted.
    #[error("Recognizer deletion failed for {name}: {reason} {location}")]
    RecognizerDeletionFailed {
        /// Full resource name of the recognizer.
        name: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Batch recognition request was rejected on submission.
    #[error("Batch submission failed: {reason} {location}")]
    BatchSubmissionFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Remote operation finished with an error, or a poll request failed.
    #[error("Operation {operation} failed (code {code}): {message} {location}")]
    OperationFailed {
        /// Operation name.
        operation: String,
        /// Status code reported by the service (0 when unknown).
        code: i32,
        /// Error message reported by the service.
        message: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation did not complete within the allotted wait.
    #[error("Operation {operation} timed out after {waited_secs}s {location}")]
    OperationTimedOut {
        /// Operation name.
        operation: String,
        /// Seconds spent waiting before giving up.
        waited_secs: u64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Waiting was cancelled by the caller.
    #[error("Operation {operation} cancelled {location}")]
    OperationCancelled {
        /// Operation name.
        operation: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Completed response has no entry for the submitted audio URI.
    #[error("No result for {uri} in recognition response {location}")]
    ResultMissing {
        /// Audio URI that was submitted.
        uri: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The service reported an error for one specific file.
    #[error("Recognition of {uri} failed (code {code}): {message} {location}")]
    FileRecognitionFailed {
        /// Audio URI that was submitted.
        uri: String,
        /// Status code reported by the service.
        code: i32,
        /// Error message reported by the service.
        message: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Response payload could not be decoded.
    #[error("Failed to parse {what}: {source} {location}")]
    ResultParseFailed {
        /// Which payload failed to decode.
        what: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Bearer token could not be obtained.
    #[error("Authentication failed: {reason} {location}")]
    AuthFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {source} {location}")]
    Http {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Manual From<reqwest::Error> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<reqwest::Error> for CloudError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        CloudError::Http {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`CloudError`].
pub type Result<T> = std::result::Result<T, CloudError>;
