//! Cloud-scribe Core Library
//!
//! Stages audio in Google Cloud Storage and transcribes it with the
//! Speech-to-Text v2 batch API.
//!
//! # Example
//!
//! ```no_run
//! use cloud_scribe_core::{
//!     CoreResult, Credentials, GcsClient, SpeechClient, TokenSource, TranscribeOptions,
//!     Transcriber, Uploader,
//! };
//!
//! use std::{path::Path, sync::Arc};
//!
//! use tokio_util::sync::CancellationToken;
//!
//! async fn run() -> CoreResult<()> {
//!     let tokens = Arc::new(TokenSource::new(Credentials::AccessToken("ya29.token".into())));
//!     let store = Arc::new(GcsClient::new(Arc::clone(&tokens))?);
//!     let speech = Arc::new(SpeechClient::new(tokens, "global")?);
//!
//!     let uploader = Uploader::new(store.clone());
//!     let audio = uploader
//!         .upload_file("my-bucket", Path::new("meeting.mp3"), "audio/meeting.mp3")
//!         .await?;
//!
//!     let transcriber = Transcriber::new(speech, store, "my-project", "global");
//!     let transcript = transcriber
//!         .transcribe(&audio, &TranscribeOptions::default(), &CancellationToken::new())
//!         .await?;
//!
//!     println!("Transcribed: {}", transcript.text());
//!     Ok(())
//! }
//! ```

mod auth;
mod error;
mod http;
mod speech;
mod storage;

pub use {
    auth::{Credentials, ServiceAccountKey, TokenSource},
    error::CloudError,
    error::Result as CoreResult,
    speech::{
        AUTO_LANGUAGE, Alternative, CleanupPolicy, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL,
        DEFAULT_RECOGNIZER_TIMEOUT, NAMED_RECOGNIZER_TIMEOUT, OperationPoller, OperationState,
        OutputRouting, RecognizerMode, Segment, SpeechApi, SpeechClient, TranscribeOptions,
        Transcriber, TranscriptResult, default_speech_endpoint, model,
    },
    storage::{DEFAULT_STORAGE_ENDPOINT, GcsClient, ObjectRef, ObjectStore, Uploader},
};
