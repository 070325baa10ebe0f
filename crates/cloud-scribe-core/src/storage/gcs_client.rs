use crate::{
    auth::TokenSource,
    http::{failure_details, parse_endpoint, with_segments},
    storage::{ObjectRef, ObjectStore},
    {CloudError, CoreResult},
};

use std::{panic::Location, sync::Arc};

use async_trait::async_trait;
use error_location::ErrorLocation;
use reqwest::{StatusCode, Url, header::CONTENT_TYPE};
use tracing::{debug, instrument};

/// Public Google Cloud Storage endpoint.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Google Cloud Storage client over the JSON API.
pub struct GcsClient {
    http: reqwest::Client,
    endpoint: Url,
    tokens: Arc<TokenSource>,
}

impl GcsClient {
    /// Create a client against the public storage endpoint.
    #[track_caller]
    pub fn new(tokens: Arc<TokenSource>) -> CoreResult<Self> {
        Self::with_endpoint(tokens, DEFAULT_STORAGE_ENDPOINT)
    }

    /// Create a client against a custom endpoint (emulator, proxy, test server).
    #[track_caller]
    pub fn with_endpoint(tokens: Arc<TokenSource>, endpoint: &str) -> CoreResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: parse_endpoint(endpoint)?,
            tokens,
        })
    }

    fn upload_url(&self, object: &ObjectRef) -> CoreResult<Url> {
        let mut url = with_segments(
            &self.endpoint,
            &["upload", "storage", "v1", "b", object.bucket(), "o"],
        )?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", object.key());
        Ok(url)
    }

    fn metadata_url(&self, object: &ObjectRef) -> CoreResult<Url> {
        with_segments(
            &self.endpoint,
            &["storage", "v1", "b", object.bucket(), "o", object.key()],
        )
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    #[instrument(skip(self, bytes), fields(uri = %object, size = bytes.len()))]
    async fn write_object(
        &self,
        object: &ObjectRef,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> CoreResult<()> {
        let url = self.upload_url(object)?;
        let token = self.tokens.bearer().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = failure_details(response).await;
            return Err(CloudError::StorageWriteFailed {
                uri: object.uri(),
                status,
                body,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!("Object written");

        Ok(())
    }

    #[instrument(skip(self), fields(uri = %object))]
    async fn read_object(&self, object: &ObjectRef) -> CoreResult<Vec<u8>> {
        let mut url = self.metadata_url(object)?;
        url.query_pairs_mut().append_pair("alt", "media");
        let token = self.tokens.bearer().await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(CloudError::ObjectNotFound {
                uri: object.uri(),
                location: ErrorLocation::from(Location::caller()),
            }),
            status if status.is_success() => {
                let bytes = response.bytes().await?;
                debug!(size = bytes.len(), "Object read");
                Ok(bytes.to_vec())
            }
            _ => {
                let (status, body) = failure_details(response).await;
                Err(CloudError::StorageReadFailed {
                    uri: object.uri(),
                    status,
                    body,
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    #[instrument(skip(self), fields(uri = %object))]
    async fn object_exists(&self, object: &ObjectRef) -> CoreResult<bool> {
        let url = self.metadata_url(object)?;
        let token = self.tokens.bearer().await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => {
                let (status, body) = failure_details(response).await;
                Err(CloudError::StorageReadFailed {
                    uri: object.uri(),
                    status,
                    body,
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }
}
