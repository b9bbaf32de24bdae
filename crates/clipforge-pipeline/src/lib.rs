//! ClipForge processing pipeline: scene segmentation, clip scoring and
//! selection, caption chunking, and run orchestration around the Gemini
//! content-analysis collaborator.
//!
//! Data flow: analysis scenes/transcript → [`segmenter`] →
//! [`selector`] → (per clip) [`chunker`] → hook generation →
//! final [`clipforge_models::Clip`] set, driven by
//! [`processor::VideoProcessor`].

pub mod chunker;
pub mod error;
pub mod gemini;
pub mod processor;
pub mod segmenter;
pub mod selector;

pub use chunker::chunk_words;
pub use error::{PipelineError, PipelineResult};
pub use gemini::AnalysisClient;
pub use processor::{video_topic, StateObserver, VideoProcessor};
pub use segmenter::segment_lines;
pub use selector::{select_top_groups, select_top_scenes, CandidateClip, TARGET_CLIPS};
