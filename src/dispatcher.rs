//! Fan-out of per-chunk prompts to the backend.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::backend::BackendClient;
use crate::types::{Chunk, PartialResult};

/// Builds the prompt for one chunk from `(chunk_text, index, total)`.
pub type PromptFn = dyn Fn(&str, usize, usize) -> String + Send + Sync;

/// How chunk calls are scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchOptions {
    /// Run chunk calls concurrently (only when there is more than one chunk)
    pub parallel: bool,
    /// Maximum concurrent in-flight calls in parallel mode
    pub max_workers: usize,
    /// Timeout for each call attempt
    pub timeout: Duration,
}

/// Sends one prompt per chunk and collects the results in chunk order.
#[derive(Clone)]
pub struct ChunkDispatcher {
    backend: BackendClient,
}

impl ChunkDispatcher {
    /// Create a new dispatcher over the given client.
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// The client used for chunk calls.
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Dispatch every chunk and return exactly one result per chunk, sorted
    /// by chunk index.
    ///
    /// Failed calls, including calls that panic, become error-marker results
    /// at their chunk's position; the batch is never aborted. Calls run
    /// inside the returned future, so dropping it cancels them.
    pub async fn dispatch(
        &self,
        chunks: &[Chunk],
        prompt_fn: &PromptFn,
        options: &DispatchOptions,
    ) -> Vec<PartialResult> {
        let prompts: Vec<(usize, String)> = chunks
            .iter()
            .map(|chunk| (chunk.index, prompt_fn(&chunk.text, chunk.index, chunk.total)))
            .collect();

        let mut results = if options.parallel && prompts.len() > 1 {
            debug!(
                chunks = prompts.len(),
                max_workers = options.max_workers,
                "Processing chunks in parallel"
            );
            self.dispatch_parallel(prompts, options).await
        } else {
            debug!(chunks = prompts.len(), "Processing chunks sequentially");
            self.dispatch_sequential(prompts, options).await
        };

        results.sort_by_key(|result| result.index);
        results
    }

    async fn dispatch_sequential(
        &self,
        prompts: Vec<(usize, String)>,
        options: &DispatchOptions,
    ) -> Vec<PartialResult> {
        let mut results = Vec::with_capacity(prompts.len());
        for (index, prompt) in prompts {
            results.push(self.guarded_call(index, prompt, options.timeout).await);
        }
        results
    }

    async fn dispatch_parallel(
        &self,
        prompts: Vec<(usize, String)>,
        options: &DispatchOptions,
    ) -> Vec<PartialResult> {
        let timeout = options.timeout;

        // Calls start lazily, so at most `max_workers` are in flight.
        stream::iter(prompts)
            .map(|(index, prompt)| self.guarded_call(index, prompt, timeout))
            .buffer_unordered(options.max_workers.max(1))
            .collect()
            .await
    }

    /// Run one chunk call, turning a panic into a failed result.
    async fn guarded_call(&self, index: usize, prompt: String, timeout: Duration) -> PartialResult {
        let call = call_backend(&self.backend, index, &prompt, timeout);
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let cause = panic_message(&*panic);
                error!(chunk_index = index, cause = %cause, "Chunk call panicked");
                PartialResult::failed(index, format!("chunk call panicked: {cause}"))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

async fn call_backend(
    backend: &BackendClient,
    index: usize,
    prompt: &str,
    timeout: Duration,
) -> PartialResult {
    match backend.complete(prompt, timeout).await {
        Ok(text) => {
            debug!(chunk_index = index, chars = text.len(), "Chunk completed");
            PartialResult::completed(index, text)
        }
        Err(e) => {
            warn!(chunk_index = index, error = %e, "Chunk call failed");
            PartialResult::failed(index, e)
        }
    }
}
