//! Filter-string helpers for the render plan.
//!
//! Everything here is pure string construction; nothing touches the
//! engine. Text interpolated into filter expressions is escaped for the
//! characters that are structurally significant to the expression syntax.

use clipforge_models::{CaptionStyle, Layout};

use crate::error::{MediaError, MediaResult};

/// Burned-in caption font size.
pub const CAPTION_FONT_SIZE: u32 = 64;
/// Hook title font size.
pub const HOOK_FONT_SIZE: u32 = 80;
/// Call-to-action font size.
pub const CTA_FONT_SIZE: u32 = 60;
/// Watermark overlay width in pixels.
pub const WATERMARK_WIDTH: u32 = 200;
/// Watermark margin from the bottom-right corner.
pub const WATERMARK_MARGIN: u32 = 20;

/// Escape text for interpolation into a filter expression.
///
/// Quote, colon and percent are structurally significant; backslash must
/// go first so escapes are not themselves re-escaped.
pub fn escape_filter_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
        .replace('%', "\\%")
}

/// Convert a `#RRGGBB` style color to the subtitle engine's `&HBBGGRR`
/// (component-reversed) form.
pub fn hex_to_ass_color(hex: &str) -> MediaResult<String> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| MediaError::InvalidColor(hex.to_string()))?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MediaError::InvalidColor(hex.to_string()));
    }
    let (r, gb) = digits.split_at(2);
    let (g, b) = gb.split_at(2);
    Ok(format!("&H{}{}{}", b.to_uppercase(), g.to_uppercase(), r.to_uppercase()))
}

/// Aspect-adjustment crop for a layout, if the layout crops at all.
pub fn crop_filter(layout: Layout) -> Option<&'static str> {
    match layout {
        Layout::Fill => Some("crop=ih*9/16:ih"),
        Layout::Square => Some("crop=ih:ih"),
        Layout::Fit | Layout::Auto => None,
    }
}

/// Scale to the fixed target resolution for a layout.
pub fn scale_filter(layout: Layout) -> String {
    let (w, h) = layout.output_resolution();
    format!("scale={}:{}", w, h)
}

/// Subtitle burn-in filter with the clip's style-derived colors.
///
/// Presets with a text shadow get a black outline; otherwise the outline
/// matches the primary color.
pub fn subtitle_filter(style: &CaptionStyle, subtitles_name: &str) -> MediaResult<String> {
    let primary = hex_to_ass_color(&style.text_color)?;
    let outline = if style.uses_dark_outline() {
        hex_to_ass_color("#000000")?
    } else {
        primary.clone()
    };
    let force_style = format!(
        "FontName={},FontSize={},PrimaryColour={},BorderStyle=1,Outline=2,OutlineColour={},Shadow=1,Alignment=2",
        style.font, CAPTION_FONT_SIZE, primary, outline
    );
    Ok(format!(
        "subtitles={}:force_style='{}'",
        subtitles_name, force_style
    ))
}

/// Hook title overlay near the top of the frame.
pub fn hook_drawtext(font_name: &str, hook: &str) -> String {
    format!(
        "drawtext=fontfile={}:text='{}':x=(w-text_w)/2:y=(h*0.2):fontsize={}:fontcolor=white:shadowcolor=black:shadowx=2:shadowy=2",
        font_name,
        escape_filter_text(hook),
        HOOK_FONT_SIZE
    )
}

/// Call-to-action overlay near the bottom of the frame.
pub fn cta_drawtext(font_name: &str, cta: &str) -> String {
    format!(
        "drawtext=fontfile={}:text='{}':x=(w-text_w)/2:y=(h*0.8):fontsize={}:fontcolor=white:box=1:boxcolor=black@0.5:boxborderw=10",
        font_name,
        escape_filter_text(cta),
        CTA_FONT_SIZE
    )
}

/// Watermark scale + bottom-right overlay, composed after the main chain.
pub fn watermark_overlay(watermark_input: usize, video_label: &str, out_label: &str) -> String {
    format!(
        "[{}:v]scale={}:-1[wm];[{}][wm]overlay=W-w-{}:H-h-{}[{}]",
        watermark_input, WATERMARK_WIDTH, video_label, WATERMARK_MARGIN, WATERMARK_MARGIN, out_label
    )
}

/// Source-dominant music mix; duration is governed by the first (source)
/// audio input so the bed never extends the clip.
pub fn music_mix(music_input: usize, audio_label: &str, out_label: &str) -> String {
    format!(
        "{}volume=0.8[a0];[{}:a]volume=0.2[a1];[a0][a1]amix=inputs=2:duration=first[{}]",
        audio_label, music_input, out_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_models::CaptionTemplate;

    #[test]
    fn test_escape_filter_text() {
        assert_eq!(escape_filter_text("a:b"), "a\\:b");
        assert_eq!(escape_filter_text("100%"), "100\\%");
        assert_eq!(escape_filter_text("it's"), "it'\\''s");
        assert_eq!(escape_filter_text("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_hex_to_ass_color_reverses_components() {
        assert_eq!(hex_to_ass_color("#FFFF00").unwrap(), "&H00FFFF");
        assert_eq!(hex_to_ass_color("#7B61FF").unwrap(), "&HFF617B");
        assert!(hex_to_ass_color("FFFF00").is_err());
        assert!(hex_to_ass_color("#GGHH00").is_err());
    }

    #[test]
    fn test_crop_filter_per_layout() {
        assert_eq!(crop_filter(Layout::Fill), Some("crop=ih*9/16:ih"));
        assert_eq!(crop_filter(Layout::Square), Some("crop=ih:ih"));
        assert_eq!(crop_filter(Layout::Fit), None);
        assert_eq!(crop_filter(Layout::Auto), None);
    }

    #[test]
    fn test_scale_filter_per_layout() {
        assert_eq!(scale_filter(Layout::Square), "scale=1080:1080");
        assert_eq!(scale_filter(Layout::Fill), "scale=1080:1920");
    }

    #[test]
    fn test_subtitle_filter_outline_selection() {
        let style = CaptionTemplate::Hormozi1.style();
        let filter = subtitle_filter(&style, "subtitles.srt").unwrap();
        assert!(filter.contains("PrimaryColour=&H00FFFF"));
        assert!(filter.contains("OutlineColour=&H000000"));
        assert!(filter.contains("Alignment=2"));
    }

    #[test]
    fn test_overlay_and_mix_labels() {
        let wm = watermark_overlay(1, "[v]", "v_wm");
        assert!(wm.contains("[1:v]scale=200:-1[wm]"));
        assert!(wm.contains("overlay=W-w-20:H-h-20[v_wm]"));

        let mix = music_mix(2, "[0:a]", "a_mix");
        assert!(mix.contains("[2:a]volume=0.2[a1]"));
        assert!(mix.contains("amix=inputs=2:duration=first[a_mix]"));
    }
}
