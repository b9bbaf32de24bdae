//! Scene segmenter.
//!
//! Groups a chronologically ordered transcript into disjoint contiguous
//! runs whose span (last line end minus first line start) fits a
//! `[min, max]` duration window. Deterministic in input order.

use clipforge_models::transcript::span_duration;
use clipforge_models::TimedLine;
use tracing::debug;

/// Segment `lines` into disjoint contiguous groups within `[min, max]`.
///
/// Greedy accumulation: before a line would push the running span over
/// `max`, the running group is closed if it already meets `min`;
/// otherwise the oldest half is discarded (halve-and-retry) so a shorter
/// valid group can still form from the tail. The final group is closed
/// only if it meets `min`. Returns zero groups when nothing reaches
/// `min`; the caller applies its fallback pool.
pub fn segment_lines(lines: &[TimedLine], min: f64, max: f64) -> Vec<Vec<TimedLine>> {
    let mut groups: Vec<Vec<TimedLine>> = Vec::new();
    let mut current: Vec<TimedLine> = Vec::new();

    for line in lines {
        while !current.is_empty() && line.end - current[0].start > max {
            if span_duration(&current) >= min {
                groups.push(std::mem::take(&mut current));
            } else {
                // Halve-and-retry: drop the oldest half, re-test the tail.
                let drop = (current.len() / 2).max(1);
                current.drain(..drop);
            }
        }
        if current.is_empty() && line.duration() > max {
            // A single line longer than the window can never form a group.
            continue;
        }
        current.push(line.clone());
    }

    if !current.is_empty() && span_duration(&current) >= min {
        groups.push(current);
    }

    debug!(
        groups = groups.len(),
        lines = lines.len(),
        min,
        max,
        "segmented transcript"
    );
    groups
}
