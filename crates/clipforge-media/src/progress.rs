//! Engine progress parsing.
//!
//! The transcoding engine reports progress as `key=value` markers in its
//! log stream; this module folds them into [`EngineProgress`] snapshots.

use serde::{Deserialize, Serialize};

/// Progress information from the transcoding engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineProgress {
    /// Current frame number
    pub frame: u64,
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Encoding speed (e.g., 1.5 = 1.5x realtime)
    pub speed: f64,
    /// Whether encoding is complete
    pub is_complete: bool,
}

impl EngineProgress {
    /// Progress percentage given the job's trimmed duration in ms.
    pub fn percentage(&self, total_duration_ms: i64) -> f64 {
        if total_duration_ms <= 0 {
            return 0.0;
        }
        ((self.out_time_ms as f64 / total_duration_ms as f64) * 100.0).min(100.0)
    }
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(EngineProgress) + Send + 'static>;

/// Keys emitted by the engine's `-progress` reporting.
const PROGRESS_KEYS: &[&str] = &[
    "frame",
    "fps",
    "stream_0_0_q",
    "bitrate",
    "total_size",
    "out_time_us",
    "out_time_ms",
    "out_time",
    "dup_frames",
    "drop_frames",
    "speed",
    "progress",
];

/// Whether a log line is a progress marker rather than diagnostics.
///
/// Matched by key, not by the presence of `=`: real error lines often
/// echo `key=value` option text and must reach the failure report.
pub fn is_progress_line(line: &str) -> bool {
    line.trim()
        .split_once('=')
        .is_some_and(|(key, _)| PROGRESS_KEYS.contains(&key.trim()))
}

/// Fold one log line into the running progress state.
///
/// Returns a snapshot when a `progress=` marker closes an update block.
pub fn parse_progress_line(line: &str, current: &mut EngineProgress) -> Option<EngineProgress> {
    let line = line.trim();

    if let Some((key, value)) = line.split_once('=') {
        match key {
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<i64>() {
                    current.out_time_ms = if key == "out_time_us" { us / 1000 } else { us };
                }
            }
            "frame" => {
                if let Ok(frame) = value.parse() {
                    current.frame = frame;
                }
            }
            "speed" => {
                if value != "N/A" {
                    if let Some(speed_str) = value.strip_suffix('x') {
                        if let Ok(speed) = speed_str.parse() {
                            current.speed = speed;
                        }
                    }
                }
            }
            "progress" => {
                if value == "end" {
                    current.is_complete = true;
                }
                return Some(current.clone());
            }
            _ => {}
        }
    }

    None
}
