use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The file to transcribe and where it lands in the bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Local audio file to upload.
    pub source_file: PathBuf,

    /// Object key inside the bucket, e.g. `audio/sample.wav`.
    pub destination_key: String,
}
