//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Credential invalid: {0}")]
    CredentialInvalid(String),

    #[error("AI analysis failed: {0}")]
    AiFailed(String),

    #[error("No clip-worthy content found")]
    NoClipWorthyContent,

    #[error("Media error: {0}")]
    Media(#[from] clipforge_media::MediaError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn ai_failed(msg: impl Into<String>) -> Self {
        Self::AiFailed(msg.into())
    }

    /// Classify a collaborator failure message.
    ///
    /// Authentication failures are recognized by inspecting the message
    /// for a credential/key marker so the boundary can trigger a
    /// re-authentication flow instead of reporting a generic error.
    pub fn from_ai_message(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let lower = msg.to_lowercase();

        let credential = lower.contains("api key")
            || lower.contains("api_key")
            || lower.contains("unauthorized")
            || lower.contains("permission denied")
            || lower.contains("invalid credential");

        if credential {
            Self::CredentialInvalid(msg)
        } else {
            Self::AiFailed(msg)
        }
    }

    /// Check if this is a credential failure requiring re-authentication.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, PipelineError::CredentialInvalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_marker_classification() {
        let err = PipelineError::from_ai_message("API key not valid. Please pass a valid API key.");
        assert!(err.is_credential_error());

        let err = PipelineError::from_ai_message("model returned malformed JSON");
        assert!(!err.is_credential_error());
        assert!(matches!(err, PipelineError::AiFailed(_)));
    }

    #[test]
    fn test_no_content_message() {
        assert_eq!(
            PipelineError::NoClipWorthyContent.to_string(),
            "No clip-worthy content found"
        );
    }
}
