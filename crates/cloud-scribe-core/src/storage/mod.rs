mod gcs_client;
mod object_ref;
mod object_store;
mod uploader;

pub use {
    gcs_client::{DEFAULT_STORAGE_ENDPOINT, GcsClient},
    object_ref::ObjectRef,
    object_store::ObjectStore,
    uploader::Uploader,
};
