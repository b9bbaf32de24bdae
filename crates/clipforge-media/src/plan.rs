//! Render plan construction.
//!
//! A [`RenderPlan`] is the data-only specification of a single-pass
//! transcode job: input declarations, trim window, filter graph, stream
//! maps and encode parameters. Building a plan has no side effects; the
//! job runner stages files and executes it.

use clipforge_models::{Clip, EncodeConfig, ProcessingConfig};

use crate::error::MediaResult;
use crate::filters;
use crate::subtitle::generate_srt;

/// Working-storage name of the source video (always input 0).
pub const SOURCE_NAME: &str = "input.mp4";
/// Working-storage name of the watermark image.
pub const WATERMARK_NAME: &str = "watermark.png";
/// Working-storage name of the background music bed.
pub const MUSIC_NAME: &str = "music.mp3";
/// Working-storage name of the caption document.
pub const SUBTITLES_NAME: &str = "subtitles.srt";
/// Working-storage name of the font resource.
pub const FONT_NAME: &str = "font.ttf";
/// Working-storage name of the output artifact.
pub const OUTPUT_NAME: &str = "output.mp4";

/// What a declared input is, so the runner knows which asset to stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    SourceVideo,
    Watermark,
    Music,
}

/// A declared engine input.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub kind: InputKind,
    pub name: String,
}

/// A fully-specified, side-effect-free transcode job.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    /// Ordered input declarations; the source video is always index 0
    pub inputs: Vec<PlanInput>,
    /// Trim window start (seconds, source-relative)
    pub trim_start: f64,
    /// Trim window end (seconds, source-relative)
    pub trim_end: f64,
    /// Filter graph chains, joined with `;` at execution
    pub filter_complex: Vec<String>,
    /// Final video stream map
    pub video_map: String,
    /// Final audio stream map
    pub audio_map: String,
    /// Caption document content to stage as [`SUBTITLES_NAME`]
    pub subtitles: String,
    /// Output encode parameters
    pub encode: EncodeConfig,
    /// Output artifact name
    pub output: String,
}

impl RenderPlan {
    /// Clip duration covered by the trim window.
    pub fn duration(&self) -> f64 {
        (self.trim_end - self.trim_start).max(0.0)
    }

    /// Whether a watermark input is declared.
    pub fn has_watermark(&self) -> bool {
        self.inputs.iter().any(|i| i.kind == InputKind::Watermark)
    }

    /// Whether a music input is declared.
    pub fn has_music(&self) -> bool {
        self.inputs.iter().any(|i| i.kind == InputKind::Music)
    }

    /// Build the ordered engine argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.name.clone());
        }

        // Trim before any filter so filter-relative coordinates operate
        // on the trimmed duration.
        args.push("-ss".to_string());
        args.push(format!("{:.3}", self.trim_start));
        args.push("-to".to_string());
        args.push(format!("{:.3}", self.trim_end));

        args.push("-filter_complex".to_string());
        args.push(self.filter_complex.join(";"));

        args.push("-map".to_string());
        args.push(self.video_map.clone());
        args.push("-map".to_string());
        args.push(self.audio_map.clone());

        args.extend(self.encode.to_args());
        args.push(self.output.clone());

        args
    }
}

/// Build the render plan for one clip under the active config.
///
/// Pure: returns a plan value and raises no engine calls. The filter
/// chain order is fixed: aspect crop, scale, caption burn-in, hook
/// title, call-to-action; the watermark overlay composes after the main
/// chain, and the music mix never extends past the source audio.
pub fn build_render_plan(clip: &Clip, config: &ProcessingConfig) -> MediaResult<RenderPlan> {
    let mut inputs = vec![PlanInput {
        kind: InputKind::SourceVideo,
        name: SOURCE_NAME.to_string(),
    }];

    let watermark_input = config.watermark_file.as_ref().map(|_| {
        inputs.push(PlanInput {
            kind: InputKind::Watermark,
            name: WATERMARK_NAME.to_string(),
        });
        inputs.len() - 1
    });

    let with_music = config.background_music && config.background_music_file.is_some();
    let music_input = if with_music {
        inputs.push(PlanInput {
            kind: InputKind::Music,
            name: MUSIC_NAME.to_string(),
        });
        Some(inputs.len() - 1)
    } else {
        None
    };

    // Video chain: crop -> scale -> burn-in -> hook -> CTA.
    let mut video_filters = Vec::new();
    if let Some(crop) = filters::crop_filter(config.layout) {
        video_filters.push(crop.to_string());
    }
    video_filters.push(filters::scale_filter(config.layout));
    video_filters.push(filters::subtitle_filter(&clip.caption_style, SUBTITLES_NAME)?);
    if config.hook_title {
        video_filters.push(filters::hook_drawtext(FONT_NAME, &clip.hook));
    }
    if config.call_to_action && !config.cta_text.is_empty() {
        video_filters.push(filters::cta_drawtext(FONT_NAME, &config.cta_text));
    }

    let mut filter_complex = vec![format!("[0:v]{}[v]", video_filters.join(","))];
    let mut video_map = "[v]".to_string();
    let mut audio_map = "0:a".to_string();

    if let Some(idx) = watermark_input {
        filter_complex.push(filters::watermark_overlay(idx, &video_map, "v_wm"));
        video_map = "[v_wm]".to_string();
    }

    if let Some(idx) = music_input {
        filter_complex.push(filters::music_mix(idx, "[0:a]", "a_mix"));
        audio_map = "[a_mix]".to_string();
    }

    Ok(RenderPlan {
        inputs,
        trim_start: clip.start_time,
        trim_end: clip.end_time,
        filter_complex,
        video_map,
        audio_map,
        subtitles: generate_srt(&clip.transcript),
        encode: EncodeConfig::default(),
        output: OUTPUT_NAME.to_string(),
    })
}
