//! JSON wire types for the Speech-to-Text v2 REST API.
//!
//! Only the fields this crate reads or writes are modelled; unknown fields in
//! responses are ignored. Field names mirror the API and are not documented
//! individually.

#![allow(missing_docs)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Let the service detect the audio encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoDetectDecodingConfig {}

/// Model, languages and decoding used for recognition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_decoding_config: Option<AutoDetectDecodingConfig>,
}

/// A named recognizer resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recognizer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_recognition_config: Option<RecognitionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecognizeFileMetadata {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineOutputConfig {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcsOutputConfig {
    pub uri: String,
}

/// Where the service delivers transcripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionOutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_response_config: Option<InlineOutputConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcs_output_config: Option<GcsOutputConfig>,
}

impl RecognitionOutputConfig {
    /// Deliver results in the operation response.
    pub fn inline() -> Self {
        Self {
            inline_response_config: Some(InlineOutputConfig {}),
            gcs_output_config: None,
        }
    }

    /// Write results as JSON objects under `uri`.
    pub fn gcs(uri: impl Into<String>) -> Self {
        Self {
            inline_response_config: None,
            gcs_output_config: Some(GcsOutputConfig { uri: uri.into() }),
        }
    }
}

/// Body of `recognizers/*:batchRecognize`. The recognizer is part of the URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecognizeRequest {
    pub config: RecognitionConfig,
    pub files: Vec<BatchRecognizeFileMetadata>,
    pub recognition_output_config: RecognitionOutputConfig,
}

/// `google.rpc.Status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl Status {
    /// Whether this status carries an actual error.
    pub fn is_error(&self) -> bool {
        self.code != 0 || !self.message.is_empty()
    }
}

/// `google.longrunning.Operation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_end_offset: Option<String>,
}

/// Ordered recognition results for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRecognizeResults {
    #[serde(default)]
    pub results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<BatchRecognizeResults>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudStorageResult {
    pub uri: String,
}

/// Outcome for a single submitted file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecognizeFileResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_result: Option<InlineResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_storage_result: Option<CloudStorageResult>,
    /// Older responses place inline transcripts here instead of `inlineResult`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<BatchRecognizeResults>,
}

/// Completed batch response, keyed by submitted audio URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRecognizeResponse {
    #[serde(default)]
    pub results: HashMap<String, BatchRecognizeFileResult>,
}
