use crate::{
    auth::TokenSource,
    http::{failure_details, parse_endpoint, with_resource_path},
    speech::{
        SpeechApi,
        model::{BatchRecognizeRequest, Operation, Recognizer},
    },
    {CloudError, CoreResult},
};

use std::{panic::Location, sync::Arc};

use async_trait::async_trait;
use error_location::ErrorLocation;
use reqwest::{Response, Url};
use tracing::{debug, instrument};

const API_VERSION: &str = "v2";

/// Endpoint serving `location`: the global host, or the regional one.
pub fn default_speech_endpoint(location: &str) -> String {
    if location.is_empty() || location == "global" {
        "https://speech.googleapis.com".to_string()
    } else {
        format!("https://{location}-speech.googleapis.com")
    }
}

/// Speech-to-Text v2 client over the REST API.
pub struct SpeechClient {
    http: reqwest::Client,
    endpoint: Url,
    tokens: Arc<TokenSource>,
}

impl SpeechClient {
    /// Create a client for the endpoint serving `location`.
    #[track_caller]
    pub fn new(tokens: Arc<TokenSource>, location: &str) -> CoreResult<Self> {
        Self::with_endpoint(tokens, &default_speech_endpoint(location))
    }

    /// Create a client against a custom endpoint.
    #[track_caller]
    pub fn with_endpoint(tokens: Arc<TokenSource>, endpoint: &str) -> CoreResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: parse_endpoint(endpoint)?,
            tokens,
        })
    }

    fn url(&self, resource: &str) -> CoreResult<Url> {
        with_resource_path(&self.endpoint, API_VERSION, resource)
    }

    async fn operation_from(response: Response) -> CoreResult<Operation> {
        let operation: Operation = response.json().await?;
        debug!(operation = %operation.name, done = operation.done, "Operation received");
        Ok(operation)
    }
}

#[async_trait]
impl SpeechApi for SpeechClient {
    #[instrument(skip(self, recognizer))]
    async fn create_recognizer(
        &self,
        parent: &str,
        recognizer_id: &str,
        recognizer: &Recognizer,
    ) -> CoreResult<Operation> {
        let mut url = self.url(&format!("{parent}/recognizers"))?;
        url.query_pairs_mut()
            .append_pair("recognizerId", recognizer_id);
        let token = self.tokens.bearer().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(recognizer)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = failure_details(response).await;
            return Err(CloudError::RecognizerCreationFailed {
                reason: format!("status {}: {}", status, body),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Self::operation_from(response).await
    }

    #[instrument(skip(self))]
    async fn delete_recognizer(&self, name: &str) -> CoreResult<()> {
        let url = self.url(name)?;
        let token = self.tokens.bearer().await?;

        let response = self.http.delete(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            let (status, body) = failure_details(response).await;
            return Err(CloudError::RecognizerDeletionFailed {
                name: name.to_string(),
                reason: format!("status {}: {}", status, body),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    #[instrument(skip(self, request))]
    async fn batch_recognize(
        &self,
        recognizer: &str,
        request: &BatchRecognizeRequest,
    ) -> CoreResult<Operation> {
        let url = self.url(&format!("{recognizer}:batchRecognize"))?;
        let token = self.tokens.bearer().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = failure_details(response).await;
            return Err(CloudError::BatchSubmissionFailed {
                reason: format!("status {}: {}", status, body),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Self::operation_from(response).await
    }

    #[instrument(skip(self))]
    async fn get_operation(&self, name: &str) -> CoreResult<Operation> {
        let url = self.url(name)?;
        let token = self.tokens.bearer().await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            let (status, body) = failure_details(response).await;
            return Err(CloudError::OperationFailed {
                operation: name.to_string(),
                code: i32::from(status),
                message: body,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Self::operation_from(response).await
    }
}
