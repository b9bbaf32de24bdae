//! Media processing for ClipForge: subtitle generation, ffmpeg filter
//! graph construction, render planning, and transcode job execution.
//!
//! The crate is split along the render pipeline:
//! - [`subtitle`]: SRT generation and parsing
//! - [`filters`]: individual ffmpeg filter fragments and text escaping
//! - [`plan`]: pure construction of a complete render plan from a clip
//! - [`engine`]: the transcoding engine contract and process-wide handle
//! - [`ffmpeg`]: system-ffmpeg engine implementation
//! - [`runner`]: staged execution of one plan with guaranteed cleanup
//! - [`export`]: single-clip and batch (ZIP) export

pub mod engine;
pub mod error;
pub mod export;
pub mod ffmpeg;
pub mod filters;
pub mod plan;
pub mod progress;
pub mod runner;
pub mod subtitle;

#[cfg(test)]
mod testing;

pub use engine::{EngineService, TranscodeEngine};
pub use error::{MediaError, MediaResult};
pub use export::{export_all_clips, export_clip};
pub use ffmpeg::FfmpegEngine;
pub use plan::{build_render_plan, RenderPlan};
pub use progress::{EngineProgress, ProgressCallback};
pub use runner::{RenderAssets, TranscodeJobRunner};
