//! Output encode parameters for the transcode stage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default video codec (H.264, widely compatible)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "veryfast";
/// Default pixel format for broad playback compatibility
pub const DEFAULT_PIX_FMT: &str = "yuv420p";

/// Encode parameters appended to a render plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EncodeConfig {
    /// Video codec (e.g., "libx264")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset (e.g., "veryfast", "fast", "medium")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Pixel format
    #[serde(default = "default_pix_fmt")]
    pub pix_fmt: String,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_pix_fmt() -> String {
    DEFAULT_PIX_FMT.to_string()
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            pix_fmt: DEFAULT_PIX_FMT.to_string(),
        }
    }
}

impl EncodeConfig {
    /// Convert to engine command arguments.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-preset".to_string(),
            self.preset.clone(),
            "-c:v".to_string(),
            self.codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-pix_fmt".to_string(),
            self.pix_fmt.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncodeConfig::default();
        assert_eq!(config.codec, "libx264");
        assert_eq!(config.preset, "veryfast");
        assert_eq!(config.pix_fmt, "yuv420p");
    }

    #[test]
    fn test_to_args() {
        let args = EncodeConfig::default().to_args();
        assert_eq!(
            args,
            vec!["-preset", "veryfast", "-c:v", "libx264", "-c:a", "aac", "-pix_fmt", "yuv420p"]
        );
    }
}
