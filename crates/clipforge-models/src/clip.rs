//! Final clip model and filename helpers.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::style::CaptionStyle;
use crate::transcript::TimedLine;

/// A final, user-facing short-form unit with timing, hook text,
/// transcript and caption style.
///
/// Clips are derived once by the selector, may be pruned by the user,
/// and are read-only inputs to rendering.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    /// Unique clip ID
    pub id: String,
    /// Start time in the source video (seconds)
    pub start_time: f64,
    /// End time in the source video (seconds)
    pub end_time: f64,
    /// Short attention-grabbing caption label
    pub hook: String,
    /// Caption transcript (line-level, or chunked for karaoke templates)
    pub transcript: Vec<TimedLine>,
    /// Style preset selected for the run
    pub caption_style: CaptionStyle,
    /// When the clip was derived
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Clip {
    /// Create a clip with a fresh ID from its selection index.
    pub fn new(
        index: usize,
        start_time: f64,
        end_time: f64,
        hook: impl Into<String>,
        transcript: Vec<TimedLine>,
        caption_style: CaptionStyle,
    ) -> Self {
        Self {
            id: format!("clip-{}-{}", index, Uuid::new_v4()),
            start_time,
            end_time,
            hook: hook.into(),
            transcript,
            caption_style,
            created_at: Utc::now(),
        }
    }

    /// Clip duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Deterministic archive entry name for batch export.
    ///
    /// Format: `clip_{index:02}_{safe_hook}.mp4`
    pub fn output_filename(&self, index: usize) -> String {
        let safe_hook = sanitize_filename_title(&self.hook);
        if safe_hook.is_empty() {
            format!("clip_{:02}.mp4", index)
        } else {
            format!("clip_{:02}_{}.mp4", index, safe_hook)
        }
    }
}

/// Sanitize a hook/title for use in filenames.
///
/// Only allows ASCII alphanumeric, hyphen, underscore, and space; other
/// characters (including non-ASCII letters) are stripped so archive entry
/// names stay portable.
pub fn sanitize_filename_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
        .chars()
        .take(50)
        .collect()
}
