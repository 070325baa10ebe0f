use crate::{
    storage::{ObjectRef, ObjectStore},
    {CloudError, CoreResult},
};

use std::{io::ErrorKind, panic::Location, path::Path, sync::Arc};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Copies local files into a bucket.
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
}

impl Uploader {
    /// Create an uploader writing through `store`.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload `source` to `bucket` under `destination_key`.
    ///
    /// Any existing object at that key is overwritten. The content type is
    /// guessed from the source file extension.
    ///
    /// # Errors
    ///
    /// Returns `LocalFileNotFound` / `LocalFileRead` if the file cannot be
    /// read, or the store's error if the remote write is rejected.
    #[instrument(skip(self))]
    pub async fn upload_file(
        &self,
        bucket: &str,
        source: &Path,
        destination_key: &str,
    ) -> CoreResult<ObjectRef> {
        let bytes = tokio::fs::read(source).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CloudError::LocalFileNotFound {
                path: source.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            },
            _ => CloudError::LocalFileRead {
                path: source.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        let content_type = mime_guess::from_path(source).first_or_octet_stream();
        let object = ObjectRef::new(bucket, destination_key);
        let size = bytes.len();

        self.store
            .write_object(&object, bytes, content_type.essence_str())
            .await?;

        info!(
            source = ?source,
            uri = %object,
            size,
            content_type = %content_type,
            "File uploaded"
        );

        Ok(object)
    }
}
