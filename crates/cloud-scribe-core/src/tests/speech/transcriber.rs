use crate::{
    CleanupPolicy, CloudError, ObjectRef, OutputRouting, RecognizerMode, TranscribeOptions,
    Transcriber,
    tests::fakes::{
        BATCH_OPERATION, CreateBehaviour, FakeSpeech, InMemoryStore, PollBehaviour,
        inline_response,
    },
};

use std::{sync::Arc, time::Duration};

use serde_json::json;
use tokio_util::sync::CancellationToken;

const URI: &str = "gs://bucket/audio/sample.wav";
const PARENT: &str = "projects/test-project/locations/global";

fn audio() -> ObjectRef {
    ObjectRef::new("bucket", "audio/sample.wav")
}

fn store_with_audio() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new().with_object(&audio(), b"RIFF audio"))
}

fn transcriber(speech: &Arc<FakeSpeech>, store: &Arc<InMemoryStore>) -> Transcriber {
    Transcriber::new(speech.clone(), store.clone(), "test-project", "global")
}

fn fast(options: TranscribeOptions) -> TranscribeOptions {
    TranscribeOptions {
        timeout: Duration::from_secs(30),
        poll_interval: Duration::from_secs(1),
        ..options
    }
}

/// WHAT: Named mode creates, recognizes, then deletes its recognizer
/// WHY: Dedicated recognizers must not outlive the job
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_uploaded_audio_when_transcribing_with_named_recognizer_then_transcript_and_cleanup() {
    // Given: Audio in storage and a service that finishes after two polls
    let speech = Arc::new(
        FakeSpeech::completing(inline_response(URI, &[("hello world", "en-US")]))
            .polling(PollBehaviour::CompleteAfter(2)),
    );
    let store = store_with_audio();

    // When: Transcribing with the dedicated recognizer
    let transcript = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await
        .unwrap();

    // Then: One segment with the detected language
    assert_eq!(transcript.audio_uri, URI);
    assert_eq!(transcript.text(), "hello world");
    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].language_code.as_deref(), Some("en-US"));

    // Then: Calls happen in order against the same recognizer
    let calls = speech.calls();
    assert!(calls[0].starts_with(&format!("create:{PARENT}/recognizers/scribe-")));
    let recognizer = calls[0].trim_start_matches("create:").to_string();
    assert_eq!(calls[1], format!("batch:{recognizer}:{URI}"));
    assert_eq!(calls[2], format!("poll:{BATCH_OPERATION}"));
    assert_eq!(calls[3], format!("poll:{BATCH_OPERATION}"));
    assert_eq!(calls[4], format!("delete:{recognizer}"));
    assert_eq!(calls.len(), 5);
}

/// WHAT: Recognizer ids are unique per job
/// WHY: Concurrent or repeated runs must not collide on a recognizer
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_two_jobs_when_transcribing_then_recognizer_ids_differ() {
    // Given: A service that completes immediately
    let speech = Arc::new(FakeSpeech::completing(inline_response(URI, &[("hi", "en-US")])));
    let store = store_with_audio();
    let transcriber = transcriber(&speech, &store);
    let options = fast(TranscribeOptions::named_recognizer());

    // When: Running two jobs
    for _ in 0..2 {
        transcriber
            .transcribe(&audio(), &options, &CancellationToken::new())
            .await
            .unwrap();
    }

    // Then: Two different recognizers were created
    let created: Vec<String> = speech
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("create:"))
        .collect();
    assert_eq!(created.len(), 2);
    assert_ne!(created[0], created[1]);
}

/// WHAT: A missing audio object fails before anything is submitted
/// WHY: Recognition against a nonexistent URI wastes a job and a recognizer
#[tokio::test(start_paused = true)]
async fn given_missing_object_when_transcribing_then_object_not_found_without_submission() {
    // Given: An empty store
    let speech = Arc::new(FakeSpeech::completing(json!({})));
    let store = Arc::new(InMemoryStore::new());

    // When: Transcribing a key that was never uploaded
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: ObjectNotFound and no speech call at all
    assert!(matches!(
        &result,
        Err(CloudError::ObjectNotFound { uri, .. }) if uri == URI
    ));
    assert!(speech.calls().is_empty());
}

/// WHAT: A response without an entry for the audio URI is ResultMissing
/// WHY: Results are keyed by URI; another file's results are not ours
#[tokio::test(start_paused = true)]
async fn given_response_for_other_uri_when_transcribing_then_result_missing() {
    // Given: A response keyed by a different object
    let speech = Arc::new(FakeSpeech::completing(inline_response(
        "gs://bucket/other.wav",
        &[("nope", "en-US")],
    )));
    let store = store_with_audio();

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: ResultMissing for our URI
    assert!(matches!(
        &result,
        Err(CloudError::ResultMissing { uri, .. }) if uri == URI
    ));
}

/// WHAT: A per-file error in the response is FileRecognitionFailed
/// WHY: The operation can succeed while the single file fails
#[tokio::test(start_paused = true)]
async fn given_per_file_error_when_transcribing_then_file_recognition_failed() {
    // Given: A response whose entry carries an error status
    let response = json!({
        "results": { URI: { "error": { "code": 3, "message": "unsupported encoding" } } }
    });
    let speech = Arc::new(FakeSpeech::completing(response));
    let store = store_with_audio();

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: The per-file status is surfaced
    assert!(matches!(
        &result,
        Err(CloudError::FileRecognitionFailed { code: 3, message, .. }) if message == "unsupported encoding"
    ));
}

/// WHAT: Older responses with a top-level transcript still decode
/// WHY: Both inline shapes are returned by the service
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_legacy_transcript_field_when_transcribing_then_segments_read() {
    // Given: A response using the `transcript` field directly
    let response = json!({
        "results": {
            URI: { "transcript": { "results": [
                { "alternatives": [{ "transcript": " bonjour " }], "languageCode": "fr-FR" },
                { "alternatives": [{ "transcript": "le monde" }], "languageCode": "fr-FR" }
            ] } }
        }
    });
    let speech = Arc::new(FakeSpeech::completing(response));
    let store = store_with_audio();

    // When: Transcribing
    let transcript = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await
        .unwrap();

    // Then: Segments are read in order
    assert_eq!(transcript.segments.len(), 2);
    assert_eq!(transcript.text(), "bonjour le monde");
}

/// WHAT: Cleanup Always deletes the recognizer even when the job fails
/// WHY: A failed job must not leak a recognizer
#[tokio::test(start_paused = true)]
async fn given_failing_job_and_always_cleanup_when_transcribing_then_recognizer_deleted() {
    // Given: A job that finishes with an error
    let speech = Arc::new(FakeSpeech::failing(7, "permission denied on bucket"));
    let store = store_with_audio();
    let options = TranscribeOptions {
        cleanup: CleanupPolicy::Always,
        ..fast(TranscribeOptions::named_recognizer())
    };

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &options, &CancellationToken::new())
        .await;

    // Then: The job error is returned and the recognizer was deleted
    assert!(matches!(result, Err(CloudError::OperationFailed { code: 7, .. })));
    assert_eq!(speech.calls_starting_with("delete:"), 1);
}

/// WHAT: Cleanup OnSuccess keeps the recognizer when the job fails
/// WHY: Lets a failing recognizer be inspected after the run
#[tokio::test(start_paused = true)]
async fn given_failing_job_and_on_success_cleanup_when_transcribing_then_recognizer_kept() {
    // Given: A job that finishes with an error
    let speech = Arc::new(FakeSpeech::failing(7, "permission denied on bucket"));
    let store = store_with_audio();
    let options = TranscribeOptions {
        cleanup: CleanupPolicy::OnSuccess,
        ..fast(TranscribeOptions::named_recognizer())
    };

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &options, &CancellationToken::new())
        .await;

    // Then: No deletion was attempted
    assert!(result.is_err());
    assert_eq!(speech.calls_starting_with("delete:"), 0);
}

/// WHAT: Cleanup Never leaves the recognizer after a successful job
/// WHY: Some deployments reuse or audit recognizers
#[tokio::test(start_paused = true)]
async fn given_never_cleanup_when_transcribing_then_recognizer_kept() {
    // Given: A successful job with cleanup disabled
    let speech = Arc::new(FakeSpeech::completing(inline_response(URI, &[("hi", "en-US")])));
    let store = store_with_audio();
    let options = TranscribeOptions {
        cleanup: CleanupPolicy::Never,
        ..fast(TranscribeOptions::named_recognizer())
    };

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &options, &CancellationToken::new())
        .await;

    // Then: Success and no deletion
    assert!(result.is_ok());
    assert_eq!(speech.calls_starting_with("delete:"), 0);
}

/// WHAT: A failed deletion does not replace the job's result
/// WHY: Cleanup problems are secondary to the transcript
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_delete_failure_when_transcribing_then_transcript_still_returned() {
    // Given: A service that rejects recognizer deletion
    let speech = Arc::new(
        FakeSpeech::completing(inline_response(URI, &[("hello", "en-US")])).rejecting_delete(),
    );
    let store = store_with_audio();

    // When: Transcribing
    let transcript = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await
        .unwrap();

    // Then: The transcript wins and deletion was attempted once
    assert_eq!(transcript.text(), "hello");
    assert_eq!(speech.calls_starting_with("delete:"), 1);
}

/// WHAT: Default mode skips create and delete and sends model and languages
/// WHY: The implicit recognizer has no configuration of its own
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_default_recognizer_when_transcribing_then_request_carries_full_config() {
    // Given: Default-mode options with explicit languages
    let speech = Arc::new(FakeSpeech::completing(inline_response(URI, &[("hola", "es-ES")])));
    let store = store_with_audio();
    let options = TranscribeOptions {
        language_codes: vec!["es-ES".to_string(), "en-US".to_string()],
        ..fast(TranscribeOptions::default_recognizer())
    };
    assert_eq!(options.recognizer, RecognizerMode::Default);

    // When: Transcribing
    let transcript = transcriber(&speech, &store)
        .transcribe(&audio(), &options, &CancellationToken::new())
        .await
        .unwrap();

    // Then: Only the batch call, against recognizers/_
    assert_eq!(transcript.text(), "hola");
    assert_eq!(
        speech.calls(),
        vec![format!("batch:{PARENT}/recognizers/_:{URI}")]
    );

    // Then: The request names model, languages and inline delivery
    let request = speech.last_request().unwrap();
    assert_eq!(request.config.model.as_deref(), Some("chirp_2"));
    assert_eq!(request.config.language_codes, vec!["es-ES", "en-US"]);
    assert!(request.recognition_output_config.inline_response_config.is_some());
}

/// WHAT: Named mode leaves model and languages to the recognizer
/// WHY: The dedicated recognizer already carries them
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_named_recognizer_when_transcribing_then_request_only_sets_decoding() {
    // Given: A completing service
    let speech = Arc::new(FakeSpeech::completing(inline_response(URI, &[("hi", "en-US")])));
    let store = store_with_audio();

    // When: Transcribing in named mode
    transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await
        .unwrap();

    // Then: Config has no model or languages
    let request = speech.last_request().unwrap();
    assert!(request.config.model.is_none());
    assert!(request.config.language_codes.is_empty());
    assert!(request.config.auto_decoding_config.is_some());
}

/// WHAT: External routing reads the result file back from storage
/// WHY: Large transcripts are delivered as objects rather than inline
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_external_routing_when_transcribing_then_result_read_from_store() {
    // Given: A response pointing at a result object that exists in storage
    let result_object = ObjectRef::new("bucket", "results/sample_transcript.json");
    let stored = json!({
        "results": [{ "alternatives": [{ "transcript": "from storage" }], "languageCode": "en-GB" }]
    });
    let store = Arc::new(
        InMemoryStore::new()
            .with_object(&audio(), b"RIFF audio")
            .with_object(&result_object, stored.to_string().as_bytes()),
    );
    let response = json!({
        "results": { URI: { "cloudStorageResult": { "uri": result_object.uri() } } }
    });
    let speech = Arc::new(FakeSpeech::completing(response));
    let options = TranscribeOptions {
        output: OutputRouting::External {
            destination_uri: "gs://bucket/results/".to_string(),
        },
        ..fast(TranscribeOptions::default_recognizer())
    };

    // When: Transcribing
    let transcript = transcriber(&speech, &store)
        .transcribe(&audio(), &options, &CancellationToken::new())
        .await
        .unwrap();

    // Then: Segments come from the stored file and the request routed output
    assert_eq!(transcript.text(), "from storage");
    assert_eq!(transcript.segments[0].language_code.as_deref(), Some("en-GB"));
    let request = speech.last_request().unwrap();
    assert_eq!(
        request
            .recognition_output_config
            .gcs_output_config
            .map(|c| c.uri)
            .as_deref(),
        Some("gs://bucket/results/")
    );
}

/// WHAT: A rejected submission fails before any poll
/// WHY: There is no operation handle to wait on
#[tokio::test(start_paused = true)]
async fn given_rejected_batch_when_transcribing_then_batch_submission_failed_without_polling() {
    // Given: A service rejecting the batch request
    let speech = Arc::new(FakeSpeech::completing(json!({})).rejecting_batch());
    let store = store_with_audio();

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: BatchSubmissionFailed, no polls, recognizer still cleaned up
    assert!(matches!(result, Err(CloudError::BatchSubmissionFailed { .. })));
    assert_eq!(speech.calls_starting_with("poll:"), 0);
    assert_eq!(speech.calls_starting_with("delete:"), 1);
}

/// WHAT: A rejected recognizer creation stops the job
/// WHY: Nothing can be recognized without the recognizer
#[tokio::test(start_paused = true)]
async fn given_rejected_create_when_transcribing_then_recognizer_creation_failed() {
    // Given: A service rejecting recognizer creation
    let speech = Arc::new(FakeSpeech::completing(json!({})).rejecting_create());
    let store = store_with_audio();

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: Creation failure, and neither batch nor delete was called
    assert!(matches!(result, Err(CloudError::RecognizerCreationFailed { .. })));
    assert_eq!(speech.calls_starting_with("batch:"), 0);
    assert_eq!(speech.calls_starting_with("delete:"), 0);
}

/// WHAT: A recognizer whose creation never finishes is still deleted
/// WHY: The create request was accepted, so the recognizer may exist
#[tokio::test(start_paused = true)]
async fn given_pending_create_and_always_cleanup_when_transcribing_then_timed_out_and_deleted() {
    // Given: A create operation that never completes
    let speech = Arc::new(FakeSpeech::completing(json!({})).creating(CreateBehaviour::Pending));
    let store = store_with_audio();

    // When: Transcribing with a 30 second ceiling
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: Timed out, no batch submitted, and the requested recognizer deleted
    assert!(matches!(result, Err(CloudError::OperationTimedOut { .. })));
    assert_eq!(speech.calls_starting_with("batch:"), 0);
    let calls = speech.calls();
    let recognizer = calls[0].trim_start_matches("create:").to_string();
    assert_eq!(calls.last(), Some(&format!("delete:{recognizer}")));
    assert_eq!(speech.calls_starting_with("delete:"), 1);
}

/// WHAT: Cancelling during creation applies the cleanup policy
/// WHY: Cleanup after a failed create follows the same policy as after a failed job
#[tokio::test(start_paused = true)]
async fn given_cancel_during_pending_create_when_transcribing_then_policy_decides_delete() {
    for (cleanup, expected_deletes) in [(CleanupPolicy::Always, 1), (CleanupPolicy::OnSuccess, 0)] {
        // Given: A create operation that never completes and a token cancelled after 3.5s
        let speech =
            Arc::new(FakeSpeech::completing(json!({})).creating(CreateBehaviour::Pending));
        let store = store_with_audio();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            trigger.cancel();
        });
        let options = TranscribeOptions {
            cleanup,
            ..fast(TranscribeOptions::named_recognizer())
        };

        // When: Transcribing
        let result = transcriber(&speech, &store)
            .transcribe(&audio(), &options, &cancel)
            .await;

        // Then: Cancelled, and deleted only under Always
        assert!(matches!(result, Err(CloudError::OperationCancelled { .. })));
        assert_eq!(speech.calls_starting_with("delete:"), expected_deletes);
    }
}

/// WHAT: A create response that is not a recognizer is a creation failure
/// WHY: The error should name the recognizer step, not a generic operation
#[tokio::test(start_paused = true)]
async fn given_malformed_create_response_when_transcribing_then_recognizer_creation_failed() {
    // Given: A create operation finishing with an unreadable response
    let speech = Arc::new(FakeSpeech::completing(json!({})).creating(CreateBehaviour::Malformed));
    let store = store_with_audio();

    // When: Transcribing
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: RecognizerCreationFailed, and the recognizer is still cleaned up
    assert!(matches!(result, Err(CloudError::RecognizerCreationFailed { .. })));
    assert_eq!(speech.calls_starting_with("batch:"), 0);
    assert_eq!(speech.calls_starting_with("delete:"), 1);
}

/// WHAT: A job outliving its ceiling times out and still cleans up
/// WHY: Timeouts must neither hang nor leak the recognizer
#[tokio::test(start_paused = true)]
async fn given_job_exceeding_ceiling_when_transcribing_then_timed_out_and_cleaned_up() {
    // Given: A job that never finishes
    let speech = Arc::new(FakeSpeech::completing(json!({})).polling(PollBehaviour::Never));
    let store = store_with_audio();

    // When: Transcribing with a 30 second ceiling
    let result = transcriber(&speech, &store)
        .transcribe(&audio(), &fast(TranscribeOptions::named_recognizer()), &CancellationToken::new())
        .await;

    // Then: Timed out, recognizer deleted
    assert!(matches!(result, Err(CloudError::OperationTimedOut { .. })));
    assert_eq!(speech.calls_starting_with("delete:"), 1);
}

/// WHAT: Mode presets carry their own ceilings
/// WHY: Dedicated recognizers allow longer jobs than the default one
#[test]
fn given_mode_presets_when_built_then_ceilings_and_defaults_match() {
    let named = TranscribeOptions::named_recognizer();
    let default = TranscribeOptions::default_recognizer();

    assert_eq!(named.timeout, Duration::from_secs(3600));
    assert_eq!(default.timeout, Duration::from_secs(600));
    assert_eq!(named.language_codes, vec!["auto"]);
    assert_eq!(named.cleanup, CleanupPolicy::Always);
    assert_eq!(TranscribeOptions::default().recognizer, RecognizerMode::Named);
}
