use crate::config::default_location;

use serde::{Deserialize, Serialize};

/// Google Cloud project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpConfig {
    /// Project that owns the recognizers and operations.
    pub project_id: String,

    /// Speech location, `global` or a region such as `us-central1`.
    #[serde(default = "default_location")]
    pub location: String,
}
