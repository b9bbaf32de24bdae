//! SRT subtitle document generation and parsing.
//!
//! The render plan burns captions in from an SRT document staged into the
//! engine's working storage; per-entry styling comes from the subtitle
//! filter's `force_style`, so the document itself stays plain.

use clipforge_models::TimedLine;

use crate::error::{MediaError, MediaResult};

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

/// Parse an SRT timestamp back to seconds.
pub fn parse_srt_time(ts: &str) -> MediaResult<f64> {
    let ts = ts.trim();
    let (hms, millis) = ts
        .split_once(',')
        .ok_or_else(|| invalid_timestamp(ts))?;
    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid_timestamp(ts));
    }
    let hours: u64 = parts[0].parse().map_err(|_| invalid_timestamp(ts))?;
    let mins: u64 = parts[1].parse().map_err(|_| invalid_timestamp(ts))?;
    let secs: u64 = parts[2].parse().map_err(|_| invalid_timestamp(ts))?;
    let millis: u64 = millis.parse().map_err(|_| invalid_timestamp(ts))?;
    Ok(hours as f64 * 3600.0 + mins as f64 * 60.0 + secs as f64 + millis as f64 / 1000.0)
}

fn invalid_timestamp(ts: &str) -> MediaError {
    MediaError::staging_failed("subtitles.srt", format!("invalid SRT timestamp '{}'", ts))
}

/// Generate an SRT document from timed caption lines.
///
/// Line timestamps stay source-relative: the plan trims with output
/// seeking, so the subtitle filter sees original presentation times.
pub fn generate_srt(transcript: &[TimedLine]) -> String {
    let mut srt = String::new();
    for (i, line) in transcript.iter().enumerate() {
        srt.push_str(&format!("{}\n", i + 1));
        srt.push_str(&format!(
            "{} --> {}\n",
            format_srt_time(line.start),
            format_srt_time(line.end)
        ));
        srt.push_str(&line.text);
        srt.push_str("\n\n");
    }
    srt
}

/// Parse an SRT document back into timed lines.
///
/// Tolerates blank-line separated entries and skips malformed blocks'
/// counters; used mainly to verify round-trip fidelity.
pub fn parse_srt(srt: &str) -> MediaResult<Vec<TimedLine>> {
    let mut lines = Vec::new();
    for block in srt.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        let mut rows = block.lines();
        // Counter row
        let Some(_) = rows.next() else { continue };
        let Some(timing) = rows.next() else { continue };
        let (start_s, end_s) = timing
            .split_once("-->")
            .ok_or_else(|| invalid_timestamp(timing))?;
        let start = parse_srt_time(start_s)?;
        let end = parse_srt_time(end_s)?;
        let text = rows.collect::<Vec<_>>().join("\n");
        lines.push(TimedLine::new(text, start, end));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_srt_time() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(1.5), "00:00:01,500");
        assert_eq!(format_srt_time(3661.25), "01:01:01,250");
    }

    #[test]
    fn test_generate_srt() {
        let transcript = vec![
            TimedLine::new("First line", 0.0, 2.0),
            TimedLine::new("Second line", 2.0, 4.5),
        ];
        let srt = generate_srt(&transcript);
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:02,000\nFirst line\n\n"));
        assert!(srt.contains("2\n00:00:02,000 --> 00:00:04,500\nSecond line\n\n"));
    }

    #[test]
    fn test_round_trip_centisecond_resolution() {
        let original = vec![TimedLine::new("hello", 1.5, 3.25)];
        let parsed = parse_srt(&generate_srt(&original)).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!((parsed[0].start - 1.5).abs() < 0.01);
        assert!((parsed[0].end - 3.25).abs() < 0.01);
        assert_eq!(parsed[0].text, "hello");
    }

    #[test]
    fn test_parse_rejects_bad_timing() {
        assert!(parse_srt("1\nnot a timestamp\ntext\n\n").is_err());
    }
}
