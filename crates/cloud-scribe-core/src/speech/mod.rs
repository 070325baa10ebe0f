pub mod model;
mod operation;
mod speech_api;
mod speech_client;
mod transcriber;
mod transcript;

pub use {
    operation::{OperationPoller, OperationState},
    speech_api::SpeechApi,
    speech_client::{SpeechClient, default_speech_endpoint},
    transcriber::{
        AUTO_LANGUAGE, CleanupPolicy, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL,
        DEFAULT_RECOGNIZER_TIMEOUT, NAMED_RECOGNIZER_TIMEOUT, OutputRouting, RecognizerMode,
        TranscribeOptions, Transcriber,
    },
    transcript::{Alternative, Segment, TranscriptResult},
};
