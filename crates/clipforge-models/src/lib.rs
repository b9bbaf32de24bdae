//! Shared data models for the ClipForge pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Timed transcripts (lines and word-level timestamps)
//! - Scenes produced by the content-analysis collaborator
//! - Final clips and caption style presets
//! - Run configuration and run/clip state enums
//! - Encoding parameters for the transcode stage

pub mod clip;
pub mod config;
pub mod encoding;
pub mod run_state;
pub mod scene;
pub mod style;
pub mod transcript;

// Re-export common types
pub use clip::{sanitize_filename_title, Clip};
pub use config::{ClipLength, Language, Layout, ProcessingConfig};
pub use encoding::EncodeConfig;
pub use run_state::{ProcessingState, RunStatus};
pub use scene::Scene;
pub use style::{CaptionStyle, CaptionTemplate};
pub use transcript::{TimedLine, Word};
