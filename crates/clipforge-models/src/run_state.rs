//! Run status state machine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Status of one processing run.
///
/// A run moves strictly forward: `Idle → Transcribing → Analyzing →
/// Generating → Done`, or to `Error` from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run in progress
    #[default]
    Idle,
    /// Waiting on the transcript/scene analysis collaborator
    Transcribing,
    /// Segmenting and scoring candidates
    Analyzing,
    /// Selecting clips and generating hooks
    Generating,
    /// Run completed with a full clip set
    Done,
    /// Run failed; message carries the terminal cause
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Transcribing => "transcribing",
            RunStatus::Analyzing => "analyzing",
            RunStatus::Generating => "generating",
            RunStatus::Done => "done",
            RunStatus::Error => "error",
        }
    }

    /// Whether the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Done | RunStatus::Error)
    }
}

/// Snapshot of run progress for observers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct ProcessingState {
    /// Current status
    pub status: RunStatus,
    /// Human-readable progress or error message
    pub message: String,
    /// Progress percentage in [0, 100]
    pub progress: f64,
}

impl ProcessingState {
    /// Build a non-terminal progress snapshot.
    pub fn progress(status: RunStatus, message: impl Into<String>, progress: f64) -> Self {
        Self {
            status,
            message: message.into(),
            progress,
        }
    }

    /// Build the terminal error snapshot.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            message: message.into(),
            progress: 0.0,
        }
    }
}
