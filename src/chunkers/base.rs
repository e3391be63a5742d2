//! Base trait for all chunkers.

use crate::types::Chunk;

/// The core trait that all chunkers must implement.
///
/// A chunker splits a transcript into ordered, size-bounded chunks. Output
/// must depend only on the input text and the chunk size.
pub trait Chunker: Send + Sync {
    /// Get the name of this chunker.
    fn name(&self) -> &'static str;

    /// Split `text` into chunks of at most `chunk_size` characters.
    ///
    /// Returns an empty vector when the text is empty or whitespace only.
    fn chunk(&self, text: &str, chunk_size: usize) -> Vec<Chunk>;

    /// Get the description of this chunker.
    fn description(&self) -> &'static str {
        "A text chunker"
    }
}

/// Byte offset `chars` characters past `start`, or `None` if the text ends
/// first.
pub fn advance_chars(text: &str, start: usize, chars: usize) -> Option<usize> {
    text[start..]
        .char_indices()
        .nth(chars)
        .map(|(offset, _)| start + offset)
}

/// Number the given pieces 1..=n.
pub fn number_pieces(pieces: Vec<&str>) -> Vec<Chunk> {
    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| Chunk::new(i + 1, total, piece))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_chars() {
        let text = "aé漢b";
        assert_eq!(advance_chars(text, 0, 0), Some(0));
        assert_eq!(advance_chars(text, 0, 2), Some(3));
        assert_eq!(advance_chars(text, 0, 3), Some(6));
        assert_eq!(advance_chars(text, 0, 4), None);
        assert_eq!(advance_chars(text, 1, 1), Some(3));
    }

    #[test]
    fn test_number_pieces() {
        let chunks = number_pieces(vec!["a", "b"]);
        assert_eq!(chunks[0], Chunk::new(1, 2, "a"));
        assert_eq!(chunks[1], Chunk::new(2, 2, "b"));
    }
}
