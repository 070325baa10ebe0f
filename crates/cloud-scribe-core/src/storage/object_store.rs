use crate::{CoreResult, storage::ObjectRef};

use async_trait::async_trait;

/// Minimal object store surface needed to stage audio and fetch results.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` to `object`, replacing any existing content.
    async fn write_object(
        &self,
        object: &ObjectRef,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> CoreResult<()>;

    /// Read the full content of `object`.
    async fn read_object(&self, object: &ObjectRef) -> CoreResult<Vec<u8>>;

    /// Whether `object` currently exists.
    async fn object_exists(&self, object: &ObjectRef) -> CoreResult<bool>;
}
