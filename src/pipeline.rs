//! Chunk -> dispatch -> combine orchestration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::backend::BackendClient;
use crate::chunkers::{Chunker, LineChunker};
use crate::combine::CombineFn;
use crate::dispatcher::{ChunkDispatcher, DispatchOptions, PromptFn};
use crate::types::{DigestConfig, PartialResult};
use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_TIMEOUT_SECS, NO_CONTENT_SENTINEL};

/// Characters reserved below the cap when truncating.
const TRUNCATION_MARGIN: usize = 10;

/// Appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Per-invocation pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Dispatch chunk calls concurrently
    pub parallel: bool,
    /// Maximum concurrent chunk calls
    pub max_workers: usize,
    /// Timeout for each chunk call attempt
    pub timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallel: false,
            max_workers: 5,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PipelineOptions {
    /// Parallel options derived from the service configuration.
    pub fn from_config(config: &DigestConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            parallel: true,
            max_workers: config.max_workers,
            timeout: config.chunk_timeout(),
        }
    }

    fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            parallel: self.parallel,
            max_workers: self.max_workers,
            timeout: self.timeout,
        }
    }
}

/// Splits text, runs one backend call per chunk and combines the results.
#[derive(Clone)]
pub struct Pipeline {
    chunker: Arc<dyn Chunker>,
    dispatcher: ChunkDispatcher,
}

impl Pipeline {
    /// Create a pipeline using the line-aligned chunker.
    pub fn new(backend: BackendClient) -> Self {
        Self {
            chunker: Arc::new(LineChunker::new()),
            dispatcher: ChunkDispatcher::new(backend),
        }
    }

    /// Replace the chunker.
    pub fn with_chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = chunker;
        self
    }

    /// The client shared by chunk calls; callers reuse it for the unify call.
    pub fn backend(&self) -> &BackendClient {
        self.dispatcher.backend()
    }

    /// Chunk and dispatch `text`, returning one result per chunk in order.
    ///
    /// Returns an empty vector, without calling the backend, when the text
    /// produces no chunks.
    pub async fn run_partials(
        &self,
        text: &str,
        prompt_fn: &PromptFn,
        options: &PipelineOptions,
    ) -> Vec<PartialResult> {
        let chunks = self.chunker.chunk(text, options.chunk_size);
        if chunks.is_empty() {
            debug!("No chunks produced, skipping dispatch");
            return vec![];
        }

        info!(
            chunker = self.chunker.name(),
            chunks = chunks.len(),
            chars = text.len(),
            parallel = options.parallel,
            "Running chunk pipeline"
        );

        self.dispatcher
            .dispatch(&chunks, prompt_fn, &options.dispatch_options())
            .await
    }

    /// Chunk, dispatch and combine `text` into one string.
    ///
    /// Returns [`NO_CONTENT_SENTINEL`] when the text produces no chunks.
    pub async fn run(
        &self,
        text: &str,
        prompt_fn: &PromptFn,
        combine_fn: &CombineFn,
        options: &PipelineOptions,
    ) -> String {
        let partials = self.run_partials(text, prompt_fn, options).await;
        if partials.is_empty() {
            return NO_CONTENT_SENTINEL.to_string();
        }
        combine_fn(&partials)
    }
}

/// Cap `text` at `max_chars` characters.
///
/// Text over the cap keeps its first `max_chars - 10` characters followed by
/// [`ELLIPSIS`].
pub fn enforce_length(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }

    let keep = max_chars.saturating_sub(TRUNCATION_MARGIN.max(ELLIPSIS.len()));
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
