//! Clip scoring and top-K selection.
//!
//! Candidates come from two sources: re-segmented transcript groups,
//! scored by a keyword/line-count/length-fit composite, or collaborator
//! Scenes, ranked by their virality score alone. Selection is a stable
//! descending sort so ties keep chronological order, which is what the
//! user sees.

use clipforge_models::transcript::span_duration;
use clipforge_models::{Scene, TimedLine};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Default number of clips produced per run.
pub const TARGET_CLIPS: usize = 6;

/// Score contribution per matched hook keyword.
const KEYWORD_WEIGHT: f64 = 5.0;

/// Hook vocabulary (English, Spanish, Hindi). Matched case-insensitively
/// against the concatenated group text; each present term counts once.
pub const HOOK_KEYWORDS: &[&str] = &[
    "amazing",
    "secret",
    "best",
    "hack",
    "tip",
    "reveal",
    "shocking",
    "insane",
    "crazy",
    "believe",
    "watch this",
    "increíble",
    "secreto",
    "mejor",
    "truco",
    "revelar",
    "impactante",
    "loco",
    "creer",
    "mira esto",
    "अद्भुत",
    "रहस्य",
    "सबसे अच्छा",
    "टिप",
    "खुलासा",
    "चौंकाने वाला",
    "पागल",
    "विश्वास",
    "यह देखो",
];

/// A scored candidate group, internal to selection.
#[derive(Debug, Clone)]
pub struct CandidateClip {
    pub lines: Vec<TimedLine>,
    pub score: f64,
}

impl CandidateClip {
    /// Timing drawn from the first line's start and last line's end.
    pub fn time_range(&self) -> (f64, f64) {
        match (self.lines.first(), self.lines.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0.0, 0.0),
        }
    }

    /// Concatenated group text, space-joined.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Count hook vocabulary terms present in `text` (case-insensitive,
/// one hit per present term).
pub fn keyword_hits(text: &str) -> usize {
    let lower = text.to_lowercase();
    HOOK_KEYWORDS.iter().filter(|kw| lower.contains(**kw)).count()
}

/// Composite score for a transcript-derived group.
///
/// `0.5 * hits * weight + 0.2 * line_count + 0.3 * length_fit` where
/// `length_fit = 1 - |duration - target| / target`. The fit term is not
/// clamped and goes negative for very poor fits.
pub fn score_group(lines: &[TimedLine], target_duration: f64) -> f64 {
    let text = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let hits = keyword_hits(&text) as f64;
    let duration = span_duration(lines);
    let length_fit = if target_duration > 0.0 {
        1.0 - (duration - target_duration).abs() / target_duration
    } else {
        0.0
    };

    0.5 * hits * KEYWORD_WEIGHT + 0.2 * lines.len() as f64 + 0.3 * length_fit
}

/// Score transcript groups and return the top `k`, best first.
///
/// The sort is stable: equal scores keep their chronological input
/// order.
pub fn select_top_groups(
    groups: Vec<Vec<TimedLine>>,
    target_duration: f64,
    k: usize,
) -> Vec<CandidateClip> {
    let mut candidates: Vec<CandidateClip> = groups
        .into_iter()
        .filter(|g| !g.is_empty())
        .map(|lines| {
            let score = score_group(&lines, target_duration);
            CandidateClip { lines, score }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(k);

    debug!(selected = candidates.len(), k, "selected transcript groups");
    candidates
}

/// Rank Scenes by virality score and return the top `k`, best first.
///
/// Scenes are first filtered to the configured duration band; if that
/// leaves nothing, selection falls back to the unfiltered pool rather
/// than producing an empty result. Only an empty pool is an error.
pub fn select_top_scenes(
    scenes: &[Scene],
    band: Option<(f64, f64)>,
    k: usize,
) -> PipelineResult<Vec<Scene>> {
    if scenes.is_empty() {
        return Err(PipelineError::NoClipWorthyContent);
    }

    let mut pool: Vec<Scene> = match band {
        Some((min, max)) => {
            let filtered: Vec<Scene> = scenes
                .iter()
                .filter(|s| (min..=max).contains(&s.duration()))
                .cloned()
                .collect();
            if filtered.is_empty() {
                debug!(min, max, "no scenes in length band, using unfiltered pool");
                scenes.to_vec()
            } else {
                filtered
            }
        }
        None => scenes.to_vec(),
    };

    pool.sort_by(|a, b| {
        b.virality_score
            .partial_cmp(&a.virality_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pool.truncate(k);
    Ok(pool)
}
