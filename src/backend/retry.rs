//! Bounded exponential backoff for idempotent backend calls.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::BackendError;
use crate::DEFAULT_RETRY_COUNT;

/// Retry configuration for transient failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry (doubles each retry)
    pub initial_backoff: Duration,
    /// Upper bound for a single delay
    pub max_backoff: Duration,
    /// Scale each delay by a random factor in 50-100%
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_COUNT,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy with the given total attempt budget and default delays.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Delay after the given failed attempt (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let capped = self
            .initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff);

        if !self.jitter {
            return capped;
        }

        let jitter_factor = 0.5 + (rand::random::<f64>() * 0.5);
        capped.mul_f64(jitter_factor)
    }

    /// Run `op` until it succeeds, fails permanently, or the attempt budget
    /// is spent. `op` receives the 1-based attempt number.
    ///
    /// Permanent errors are returned unchanged; a spent budget is reported as
    /// [`BackendError::Exhausted`] wrapping the last transient error.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, BackendError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => {
                    warn!(attempt, error = %e, "Backend call failed permanently");
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    error!(attempt, error = %e, "Backend call failed, retry budget spent");
                    return Err(BackendError::Exhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.backoff_for(attempt);
                    warn!(attempt, error = %e, ?delay, "Backend call failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
            jitter: false,
        }
    }

    fn unavailable() -> BackendError {
        BackendError::Status {
            status: 503,
            body: "busy".to_string(),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1000),
            jitter: false,
        };
        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_for(5), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(64), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_millis(400),
            ..Default::default()
        };
        for _ in 0..50 {
            let delay = policy.backoff_for(1);
            assert!(delay >= Duration::from_millis(200) && delay <= Duration::from_millis(400));
        }
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let result = fast()
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(unavailable())
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(BackendError::Status {
                        status: 401,
                        body: "bad key".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(BackendError::Status { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_budget_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(unavailable()) }
            })
            .await;

        match result {
            Err(BackendError::Exhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, BackendError::Status { status: 503, .. }));
            }
            other => panic!("expected exhausted error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..fast()
        };
        let result = tokio_test::block_on(policy.run(|_| async { Ok::<_, BackendError>(7) }));
        assert_eq!(result.unwrap(), 7);
    }
}
