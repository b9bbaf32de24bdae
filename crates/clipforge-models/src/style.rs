//! Caption template and style preset definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Available caption templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptionTemplate {
    /// Bold yellow block captions
    #[default]
    Hormozi1,
    /// White captions with heavy outline
    Hormozi2,
    /// Word-by-word highlight captions; requires word-level chunking
    Karaoke,
}

impl CaptionTemplate {
    /// All available templates.
    pub const ALL: &'static [CaptionTemplate] = &[
        CaptionTemplate::Hormozi1,
        CaptionTemplate::Hormozi2,
        CaptionTemplate::Karaoke,
    ];

    /// Whether this template renders word-by-word and therefore needs the
    /// caption chunker's regrouped transcript.
    pub fn is_word_highlight(&self) -> bool {
        matches!(self, CaptionTemplate::Karaoke)
    }

    /// Returns the template name as used in filenames.
    pub fn as_filename_part(&self) -> &'static str {
        match self {
            CaptionTemplate::Hormozi1 => "hormozi1",
            CaptionTemplate::Hormozi2 => "hormozi2",
            CaptionTemplate::Karaoke => "karaoke",
        }
    }

    /// The immutable style preset for this template.
    pub fn style(&self) -> CaptionStyle {
        match self {
            CaptionTemplate::Hormozi1 => CaptionStyle {
                font: "Inter".to_string(),
                text_color: "#FFFF00".to_string(),
                background_color: "rgba(0, 0, 0, 0.0)".to_string(),
                highlight_color: "#FFFFFF".to_string(),
                text_shadow: Some("0 0 5px #000".to_string()),
                font_weight: 800,
            },
            CaptionTemplate::Hormozi2 => CaptionStyle {
                font: "Inter".to_string(),
                text_color: "#FFFFFF".to_string(),
                background_color: "rgba(0, 0, 0, 0.6)".to_string(),
                highlight_color: "#7B61FF".to_string(),
                text_shadow: Some("2px 2px 4px rgba(0,0,0,0.7)".to_string()),
                font_weight: 700,
            },
            CaptionTemplate::Karaoke => CaptionStyle {
                font: "Inter".to_string(),
                text_color: "#FFFFFF".to_string(),
                background_color: "transparent".to_string(),
                highlight_color: "#7B61FF".to_string(),
                text_shadow: Some("1px 1px 2px rgba(0,0,0,0.5)".to_string()),
                font_weight: 600,
            },
        }
    }
}

impl fmt::Display for CaptionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filename_part())
    }
}

impl FromStr for CaptionTemplate {
    type Err = TemplateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hormozi1" => Ok(CaptionTemplate::Hormozi1),
            "hormozi2" => Ok(CaptionTemplate::Hormozi2),
            "karaoke" => Ok(CaptionTemplate::Karaoke),
            _ => Err(TemplateParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown caption template: {0}")]
pub struct TemplateParseError(String);

/// An immutable named caption style preset.
///
/// Selected once per run from the template catalog; never mutated after
/// clip creation. Colors are hex/CSS strings as authored in the catalog;
/// the render plan builder converts them to the subtitle engine's native
/// color order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionStyle {
    /// Font family name
    pub font: String,
    /// Primary caption text color (hex `#RRGGBB`)
    pub text_color: String,
    /// Caption background color (CSS color string)
    pub background_color: String,
    /// Highlight color for word-by-word templates
    pub highlight_color: String,
    /// Optional CSS text shadow; presence selects a black outline at burn-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_shadow: Option<String>,
    /// Font weight
    pub font_weight: u16,
}

impl CaptionStyle {
    /// Whether burn-in should use a black outline rather than the primary
    /// color (presets with a text shadow get the black outline).
    pub fn uses_dark_outline(&self) -> bool {
        self.text_shadow
            .as_deref()
            .map(|s| s != "none")
            .unwrap_or(false)
    }
}
