//! Line-aligned chunker for chat transcripts.

use super::base::{advance_chars, number_pieces, Chunker};
use crate::types::Chunk;

/// Splits text into windows of at most `chunk_size` characters, cutting at
/// the last line break inside each window.
///
/// A line longer than the window is never split: it becomes one oversized
/// chunk. Pieces are trimmed and empty pieces are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineChunker;

impl LineChunker {
    /// Create a new line chunker.
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for LineChunker {
    fn name(&self) -> &'static str {
        "line"
    }

    fn description(&self) -> &'static str {
        "Splits transcripts into size-bounded windows aligned to line breaks"
    }

    fn chunk(&self, text: &str, chunk_size: usize) -> Vec<Chunk> {
        chunk_text(text, chunk_size)
    }
}

/// Split `text` into line-aligned chunks of at most `chunk_size` characters.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<Chunk> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }

    let chunk_size = chunk_size.max(1);
    if advance_chars(text, 0, chunk_size).is_none() {
        return number_pieces(vec![text]);
    }

    number_pieces(split_pieces(text, chunk_size))
}

fn split_pieces(text: &str, chunk_size: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // Remainder fits in one window
        let Some(window_end) = advance_chars(text, start, chunk_size) else {
            push_trimmed(&mut pieces, &text[start..]);
            break;
        };

        let cut = match text[start..window_end].rfind('\n') {
            Some(pos) if pos > 0 => start + pos,
            // No break inside the window: keep the line whole
            _ => text[window_end..]
                .find('\n')
                .map_or(text.len(), |pos| window_end + pos),
        };

        push_trimmed(&mut pieces, &text[start..cut]);
        start = cut;
    }

    pieces
}

fn push_trimmed<'a>(pieces: &mut Vec<&'a str>, piece: &'a str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip_whitespace(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// 90 lines of 99 characters plus newline: 9000 characters.
    fn transcript_9000() -> String {
        (0..90)
            .map(|i| format!("@user{:02}: {}\n", i, "x".repeat(90)))
            .collect()
    }

    #[test]
    fn test_empty_content() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("  \n\t ", 100).is_empty());
    }

    #[test]
    fn test_small_content() {
        let chunks = chunk_text("  @alice: hello\n@bob: hi  \n", 100);
        assert_eq!(chunks, vec![Chunk::new(1, 1, "@alice: hello\n@bob: hi")]);
    }

    #[test]
    fn test_exact_size_is_single_chunk() {
        let text = "a".repeat(50);
        let chunks = chunk_text(&text, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn test_9000_chars_make_three_chunks() {
        let text = transcript_9000();
        assert_eq!(text.chars().count(), 9000);

        let chunks = chunk_text(&text, 4000);
        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i + 1);
            assert_eq!(chunk.total, 3);
            assert!(chunk.len() <= 4000, "chunk {} has {} chars", chunk.index, chunk.len());
            assert!(chunk.text.starts_with("@user"));
            assert!(chunk.text.ends_with('x'));
        }
    }

    #[test]
    fn test_reconstruction_without_loss() {
        let text = transcript_9000();
        for size in [1, 7, 100, 999, 4000] {
            let joined: String = chunk_text(&text, size)
                .iter()
                .map(|c| c.text.as_str())
                .collect();
            assert_eq!(strip_whitespace(&joined), strip_whitespace(&text));
        }
    }

    #[test]
    fn test_boundaries_are_stable() {
        let text = transcript_9000();
        assert_eq!(chunk_text(&text, 1234), chunk_text(&text, 1234));
    }

    #[test]
    fn test_long_line_is_not_split() {
        let long = "x".repeat(50);
        let text = format!("short\n{long}\nend");

        let chunks = chunk_text(&text, 10);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["short", long.as_str(), "end"]);
    }

    #[test]
    fn test_text_without_newlines_stays_whole() {
        let text = "y".repeat(30);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 30);
    }

    #[test]
    fn test_multibyte_text() {
        let text = (0..20)
            .map(|i| format!("@ünïcødé{i}: привет мир 👋"))
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = chunk_text(&text, 60);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 60);
        }
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(strip_whitespace(&joined), strip_whitespace(&text));
    }

    #[test]
    fn test_zero_chunk_size_is_treated_as_one() {
        let chunks = chunk_text("a\nb\nc", 0);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
