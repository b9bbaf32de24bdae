//! Scene model produced by the content-analysis collaborator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::transcript::TimedLine;

/// An analysis-collaborator-produced segment with topic, summary,
/// virality score and its own transcript.
///
/// Scenes are produced wholesale once per run and treated as immutable
/// input; field names match the collaborator's camelCase JSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Scene topic
    pub topic: String,
    /// Short scene summary
    pub summary: String,
    /// Virality score in [1, 10]
    pub virality_score: f64,
    /// Model reasoning for the score
    pub reasoning: String,
    /// Scene transcript with optional word timestamps and emoji
    pub transcript: Vec<TimedLine>,
}

impl Scene {
    /// Scene duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Whether the score lies in the contract's [1, 10] band.
    pub fn has_valid_score(&self) -> bool {
        (1.0..=10.0).contains(&self.virality_score)
    }
}
