use crate::{CloudError, CoreResult};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;

const GS_SCHEME: &str = "gs://";

/// Identifies a single object in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    bucket: String,
    key: String,
}

impl ObjectRef {
    /// Reference `key` inside `bucket`.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a `gs://bucket/key` URI.
    #[track_caller]
    pub fn parse_uri(uri: &str) -> CoreResult<Self> {
        let invalid = || CloudError::InvalidObjectUri {
            uri: uri.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        let rest = uri.strip_prefix(GS_SCHEME).ok_or_else(invalid)?;
        let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;

        if bucket.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(bucket, key))
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key within the bucket.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The `gs://bucket/key` form used by the speech API.
    pub fn uri(&self) -> String {
        format!("{GS_SCHEME}{}/{}", self.bucket, self.key)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GS_SCHEME}{}/{}", self.bucket, self.key)
    }
}
