//! Chunk and partial-result type definitions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::ERROR_MARKER;

/// A bounded slice of a transcript.
///
/// Chunks are produced once by a chunker and never modified afterwards.
/// The index is the only ordering key the rest of the pipeline relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk within its source text (1-based)
    pub index: usize,

    /// Number of chunks produced from the same source text
    pub total: usize,

    /// The trimmed chunk text
    pub text: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(index: usize, total: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            total,
            text: text.into(),
        }
    }

    /// Length of the chunk in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Whether a partial result came back from the backend or stands in for a
/// failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialOutcome {
    Completed,
    Failed,
}

/// Output of one backend call, tagged with the index of the chunk it was
/// produced from.
///
/// A failed call still yields a result: its text carries the error marker
/// so that combining never observes a hole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResult {
    pub index: usize,
    pub text: String,
    pub outcome: PartialOutcome,
}

impl PartialResult {
    /// A successful completion for the given chunk.
    pub fn completed(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            outcome: PartialOutcome::Completed,
        }
    }

    /// A placeholder for a chunk whose call failed.
    pub fn failed(index: usize, cause: impl Display) -> Self {
        Self {
            index,
            text: format!("{ERROR_MARKER}{cause}"),
            outcome: PartialOutcome::Failed,
        }
    }

    /// Check if this result stands in for a failed call.
    pub fn is_failed(&self) -> bool {
        self.outcome == PartialOutcome::Failed
    }
}
