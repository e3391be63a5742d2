//! Error types for the backend client and configuration loading.

use std::time::Duration;

/// Failure of a completion request to the text-generation backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{source} (gave up after {attempts} attempts)")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<BackendError>,
    },
}

impl BackendError {
    /// Classify a reqwest failure raised while sending or decoding.
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            BackendError::Timeout(timeout)
        } else if error.is_decode() {
            BackendError::Malformed(error.to_string())
        } else {
            BackendError::Transport(error)
        }
    }

    /// Whether another attempt may succeed: timeouts, transport failures,
    /// 429 and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Timeout(_) | BackendError::Transport(_) => true,
            BackendError::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            BackendError::Malformed(_) | BackendError::Exhausted { .. } => false,
        }
    }
}

/// Failure to assemble a usable [`crate::types::DigestConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let status = |code| BackendError::Status {
            status: code,
            body: String::new(),
        };

        assert!(status(429).is_transient());
        assert!(status(500).is_transient());
        assert!(status(503).is_transient());
        assert!(!status(400).is_transient());
        assert!(!status(401).is_transient());
        assert!(!status(404).is_transient());
    }

    #[test]
    fn test_exhausted_is_final() {
        let err = BackendError::Exhausted {
            attempts: 3,
            source: Box::new(BackendError::Timeout(Duration::from_secs(1))),
        };
        assert!(!err.is_transient());
        assert!(err.to_string().contains("gave up after 3 attempts"));
        assert!(!BackendError::Malformed("no choices".into()).is_transient());
    }
}
