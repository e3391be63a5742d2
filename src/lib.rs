//! Chat Digest Service Library
//!
//! Splits long chat transcripts into bounded chunks, summarizes each chunk
//! through a text-generation backend, and merges the ordered partial results
//! into one bounded-length digest.

pub mod api;
pub mod backend;
pub mod chunkers;
pub mod combine;
pub mod digest;
pub mod dispatcher;
pub mod error;
pub mod jobs;
pub mod pipeline;
pub mod sanitize;
pub mod types;

pub use backend::{BackendClient, CompletionBackend, OpenAiBackend, RetryPolicy};
pub use chunkers::{chunk_text, Chunker, LineChunker};
pub use digest::Digester;
pub use dispatcher::ChunkDispatcher;
pub use error::{BackendError, ConfigError};
pub use pipeline::{enforce_length, Pipeline, PipelineOptions};
pub use types::{Chunk, DigestConfig, DigestKind, PartialResult};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::backend::*;
    pub use crate::chunkers::{chunk_text, Chunker, LineChunker};
    pub use crate::combine::*;
    pub use crate::digest::Digester;
    pub use crate::pipeline::*;
    pub use crate::sanitize::{HtmlSanitizer, Sanitizer};
    pub use crate::types::*;
}

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 4000;

/// Default number of concurrent chunk calls
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Default total attempts per backend call
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Default timeout for a single backend call, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default timeout for a per-chunk backend call, in seconds
pub const DEFAULT_CHUNK_TIMEOUT_SECS: u64 = 30;

/// Returned by the pipeline when the input produces no chunks
pub const NO_CONTENT_SENTINEL: &str = "No content to process.";

/// Prefix of the placeholder text that stands in for a failed call
pub const ERROR_MARKER: &str = "Error: ";
