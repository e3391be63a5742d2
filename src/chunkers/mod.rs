//! Chunking strategies for chat transcripts.

mod base;
mod line_chunker;

pub use base::{advance_chars, number_pieces, Chunker};
pub use line_chunker::{chunk_text, LineChunker};
