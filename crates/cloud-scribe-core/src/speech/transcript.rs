use crate::speech::model::{BatchRecognizeResults, SpeechRecognitionResult};

/// One ranked hypothesis for a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    /// Recognized text.
    pub transcript: String,
    /// Service-reported confidence, when available.
    pub confidence: Option<f32>,
}

/// A recognized stretch of audio.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Hypotheses, best first.
    pub alternatives: Vec<Alternative>,
    /// Language detected for this segment, if any.
    pub language_code: Option<String>,
}

impl Segment {
    /// The highest-ranked hypothesis.
    pub fn top_hypothesis(&self) -> Option<&Alternative> {
        self.alternatives.first()
    }
}

impl From<SpeechRecognitionResult> for Segment {
    fn from(result: SpeechRecognitionResult) -> Self {
        Self {
            alternatives: result
                .alternatives
                .into_iter()
                .map(|a| Alternative {
                    transcript: a.transcript,
                    confidence: a.confidence,
                })
                .collect(),
            language_code: result.language_code.filter(|code| !code.is_empty()),
        }
    }
}

/// Transcript for one audio object, segments in recognition order.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptResult {
    /// The `gs://` URI that was transcribed.
    pub audio_uri: String,
    /// Recognized segments.
    pub segments: Vec<Segment>,
}

impl TranscriptResult {
    pub(crate) fn from_results(audio_uri: String, results: BatchRecognizeResults) -> Self {
        Self {
            audio_uri,
            segments: results.results.into_iter().map(Segment::from).collect(),
        }
    }

    /// Top hypotheses of all segments joined with single spaces.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(Segment::top_hypothesis)
            .map(|a| a.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
