//! Caption chunker for word-highlight templates.
//!
//! Karaoke-style rendering needs denser, rhythm-aligned caption lines
//! than the collaborator's sentence boundaries. Word timestamps are
//! flattened across lines in time order and regrouped into fixed-size
//! chunks; each chunk becomes one caption line.

use clipforge_models::{TimedLine, Word};

/// Regroup a clip transcript into chunks of `words_per_caption` words.
///
/// Chunk start/end come from the first/last word, text is space-joined,
/// and the emoji is inherited from the first word's parent line. Word
/// spans are clamped into the parent line before flattening since the
/// collaborator does not guarantee containment. Lines without word
/// timestamps contribute nothing; if no line carries words the original
/// transcript is returned unchanged.
pub fn chunk_words(lines: &[TimedLine], words_per_caption: usize) -> Vec<TimedLine> {
    let size = words_per_caption.max(1);

    let mut flat: Vec<(Word, Option<String>)> = Vec::new();
    for line in lines {
        for word in line.clamped_words() {
            flat.push((word, line.emoji.clone()));
        }
    }
    if flat.is_empty() {
        return lines.to_vec();
    }
    // Lines are chronological but word timings may interleave at line
    // boundaries; stable sort keeps within-line order for equal starts.
    flat.sort_by(|a, b| {
        a.0.start
            .partial_cmp(&b.0.start)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    flat.chunks(size)
        .map(|chunk| {
            let first = &chunk[0];
            let last = &chunk[chunk.len() - 1];
            let text = chunk
                .iter()
                .map(|(w, _)| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            TimedLine {
                text,
                start: first.0.start,
                end: last.0.end,
                words: chunk.iter().map(|(w, _)| w.clone()).collect(),
                emoji: first.1.clone(),
            }
        })
        .collect()
}
