use serde::{Deserialize, Serialize};

/// Object storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket the audio is uploaded to.
    pub bucket: String,
}
