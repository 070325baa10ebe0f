//! User-facing progress and transcript lines.
//!
//! Logs go to stderr through `tracing`; everything printed here goes to the
//! wrapped writer, stdout in the binary.

use crate::AppResult;

use std::{
    io::{self, Stdout, Write},
    path::Path,
};

use cloud_scribe_core::TranscriptResult;
use tracing::{debug, instrument};

/// Writes progress messages and transcripts.
pub struct OutputHandler<W: Write> {
    pub(crate) writer: W,
}

impl OutputHandler<Stdout> {
    /// Output handler printing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputHandler<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Report a finished upload.
    pub fn uploaded(&mut self, source: &Path, destination_key: &str) -> AppResult<()> {
        writeln!(
            self.writer,
            "File {} uploaded to {}.",
            source.display(),
            destination_key
        )?;
        self.writer.flush()?;
        Ok(())
    }

    /// Announce the blocking wait on the recognition job.
    pub fn waiting(&mut self) -> AppResult<()> {
        writeln!(self.writer, "Waiting for operation to complete...")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Print the top hypothesis of every segment, optionally with its language.
    #[instrument(skip(self, transcript), fields(segments = transcript.segments.len()))]
    pub fn transcript(
        &mut self,
        transcript: &TranscriptResult,
        show_detected_language: bool,
    ) -> AppResult<()> {
        for segment in &transcript.segments {
            let Some(top) = segment.top_hypothesis() else {
                continue;
            };

            writeln!(self.writer, "Transcript: {}", top.transcript)?;

            if show_detected_language && let Some(language) = &segment.language_code {
                writeln!(self.writer, "Detected language: {}", language)?;
            }
        }

        self.writer.flush()?;

        debug!("Transcript written");

        Ok(())
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
