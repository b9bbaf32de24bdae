//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while building or executing a transcode job.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("Engine initialization failed: {0}")]
    EngineInitFailed(String),

    #[error("Engine execution failed: {message}")]
    ExecFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Staging failed for '{name}': {message}")]
    StagingFailed { name: String, message: String },

    #[error("Output artifact missing from working storage: {0}")]
    OutputMissing(String),

    #[error("Invalid style color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    #[error("Invalid working-storage name: {0}")]
    InvalidStorageName(String),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an execution failure error.
    pub fn exec_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::ExecFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a staging failure error.
    pub fn staging_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StagingFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}
