//! Timed transcript lines and word-level timestamps.
//!
//! Field names mirror the content-analysis collaborator's JSON contract
//! (`start`, `end`, `text`, `words`, `emoji`), so these types deserialize
//! its responses directly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single word with its own time span.
///
/// Always nested under a [`TimedLine`]; the span is expected to lie within
/// the parent line's span but the collaborator does not guarantee it, so
/// consumers should clamp (see [`TimedLine::clamped_words`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Word {
    /// Word text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

/// A timed transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimedLine {
    /// Line text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Word-level timestamps (may be empty for line-only transcripts)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
    /// Optional emoji suggested for the line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl TimedLine {
    /// Create a line without word timestamps.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            words: Vec::new(),
            emoji: None,
        }
    }

    /// Line duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Word timestamps clamped into the line's own span.
    ///
    /// The collaborator's word timings occasionally spill past the parent
    /// line; downstream caption chunking needs monotonic in-bounds spans.
    pub fn clamped_words(&self) -> Vec<Word> {
        self.words
            .iter()
            .map(|w| {
                let start = w.start.clamp(self.start, self.end);
                let end = w.end.clamp(start, self.end);
                Word {
                    text: w.text.clone(),
                    start,
                    end,
                }
            })
            .collect()
    }
}

/// Total span of a chronologically ordered slice of lines, in seconds.
///
/// Measured from the first line's start to the last line's end, not as a
/// sum of per-line durations, so gaps between lines count.
pub fn span_duration(lines: &[TimedLine]) -> f64 {
    match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => (last.end - first.start).max(0.0),
        _ => 0.0,
    }
}

/// Check that a line sequence is chronologically non-decreasing.
pub fn is_chronological(lines: &[TimedLine]) -> bool {
    lines.windows(2).all(|w| w[0].start <= w[1].start)
}
