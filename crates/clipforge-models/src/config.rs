//! Run configuration.
//!
//! One immutable configuration struct per run, validated once at run
//! start. A new run requires a fresh config.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Supported caption languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Spanish,
    French,
}

impl Language {
    /// Human-readable name, as interpolated into collaborator prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Spanish => "Spanish",
            Language::French => "French",
        }
    }
}

/// Preferred clip-length band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipLength {
    /// Under 30 seconds
    Under30,
    /// 30 to 60 seconds
    #[default]
    Sec30To60,
    /// 60 to 90 seconds
    Sec60To90,
    /// Keep the collaborator's original scene boundaries (no band filter)
    Original,
}

impl ClipLength {
    /// The `[min, max]` duration window in seconds, or `None` for
    /// `Original` (selection uses the unfiltered candidate pool).
    pub fn band(&self) -> Option<(f64, f64)> {
        match self {
            ClipLength::Under30 => Some((10.0, 30.0)),
            ClipLength::Sec30To60 => Some((30.0, 60.0)),
            ClipLength::Sec60To90 => Some((60.0, 90.0)),
            ClipLength::Original => None,
        }
    }

    /// Target duration used by length-fit scoring: the band midpoint.
    pub fn target_duration(&self) -> Option<f64> {
        self.band().map(|(min, max)| (min + max) / 2.0)
    }
}

/// Target aspect/crop policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Pick automatically (currently behaves like `Fit`)
    #[default]
    Auto,
    /// Crop to 9:16 and fill the portrait frame
    Fill,
    /// Scale into the portrait frame without cropping
    Fit,
    /// Crop to 1:1 square
    Square,
}

impl Layout {
    /// Output resolution (width, height) for this layout.
    pub fn output_resolution(&self) -> (u32, u32) {
        match self {
            Layout::Square => (1080, 1080),
            Layout::Auto | Layout::Fill | Layout::Fit => (1080, 1920),
        }
    }
}

/// User-chosen run parameters.
///
/// Immutable for the duration of one run; validated once at run start
/// via [`ProcessingConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = validate_languages))]
pub struct ProcessingConfig {
    /// Language spoken in the source video
    #[serde(default)]
    pub video_language: Language,

    /// Whether captions should be translated
    #[serde(default)]
    pub translate_captions: bool,

    /// Target language when translation is enabled
    #[serde(default)]
    pub translation_language: Language,

    /// Preferred clip-length band
    #[serde(default)]
    pub clip_length: ClipLength,

    /// Target aspect/crop policy
    #[serde(default)]
    pub layout: Layout,

    /// Caption template
    #[serde(default)]
    pub template: crate::style::CaptionTemplate,

    /// Overlay the generated hook as a title near the top
    #[serde(default)]
    pub hook_title: bool,

    /// Overlay call-to-action text near the bottom
    #[serde(default)]
    pub call_to_action: bool,

    /// Call-to-action text (empty text is never rendered)
    #[serde(default)]
    pub cta_text: String,

    /// Mix a background music bed under the source audio
    #[serde(default)]
    pub background_music: bool,

    /// Music asset used when `background_music` is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_music_file: Option<PathBuf>,

    /// Watermark image overlaid bottom-right when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_file: Option<PathBuf>,

    /// Words per caption chunk for word-highlight templates
    #[serde(default = "default_words_per_caption")]
    #[validate(range(min = 1, max = 8))]
    pub words_per_caption: usize,
}

fn default_words_per_caption() -> usize {
    4
}

fn validate_languages(config: &ProcessingConfig) -> Result<(), ValidationError> {
    if config.translate_captions && config.video_language == config.translation_language {
        return Err(ValidationError::new("translation_language_same_as_source"));
    }
    Ok(())
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            video_language: Language::English,
            translate_captions: false,
            translation_language: Language::Spanish,
            clip_length: ClipLength::Sec30To60,
            layout: Layout::Fit,
            template: crate::style::CaptionTemplate::Hormozi1,
            hook_title: true,
            call_to_action: false,
            cta_text: String::new(),
            background_music: false,
            background_music_file: None,
            watermark_file: None,
            words_per_caption: default_words_per_caption(),
        }
    }
}

impl ProcessingConfig {
    /// Language captions are generated in: the translation target when
    /// translation is on, otherwise the source language.
    pub fn caption_language(&self) -> Language {
        if self.translate_captions {
            self.translation_language
        } else {
            self.video_language
        }
    }
}
