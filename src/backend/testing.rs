//! In-process backend doubles for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{BackendClient, CompletionBackend, RetryPolicy};
use crate::error::BackendError;
use crate::types::ChatTurn;

type Responder =
    dyn Fn(&str, usize) -> (Duration, Result<String, BackendError>) + Send + Sync;

/// Backend whose replies are computed from the last user prompt and the
/// number of times that same prompt has been seen (1-based).
pub(crate) struct ScriptedBackend {
    responder: Box<Responder>,
    attempts: Mutex<HashMap<String, usize>>,
    conversations: Mutex<Vec<Vec<ChatTurn>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    /// Responder returns a delay and the reply.
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, usize) -> (Duration, Result<String, BackendError>) + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            attempts: Mutex::new(HashMap::new()),
            conversations: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Responder replies immediately.
    pub(crate) fn replying<F>(responder: F) -> Self
    where
        F: Fn(&str, usize) -> Result<String, BackendError> + Send + Sync + 'static,
    {
        Self::new(move |prompt, attempt| (Duration::ZERO, responder(prompt, attempt)))
    }

    /// Replies `echo: <prompt>`.
    pub(crate) fn echo() -> Self {
        Self::replying(|prompt, _| Ok(format!("echo: {prompt}")))
    }

    /// Total number of calls received.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in arrival order.
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.conversations
            .lock()
            .unwrap()
            .iter()
            .filter_map(|turns| turns.last().map(|t| t.content.clone()))
            .collect()
    }

    /// The most recent conversation received.
    pub(crate) fn last_conversation(&self) -> Vec<ChatTurn> {
        self.conversations
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[ChatTurn],
        _timeout: Duration,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.conversations.lock().unwrap().push(messages.to_vec());

        let prompt = messages.last().map(|t| t.content.as_str()).unwrap_or_default();
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let seen = attempts.entry(prompt.to_string()).or_insert(0);
            *seen += 1;
            *seen
        };

        let (delay, reply) = (self.responder)(prompt, attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

/// Retry policy with millisecond delays.
pub(crate) fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
        jitter: false,
    }
}

/// Client over `backend` using [`fast_retry`].
pub(crate) fn client_for<B>(backend: Arc<B>) -> BackendClient
where
    B: CompletionBackend + 'static,
{
    BackendClient::new(backend).with_retry(fast_retry())
}
