//! Configuration for the digest service.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_TIMEOUT_SECS, DEFAULT_MAX_WORKERS, DEFAULT_RETRY_COUNT,
    DEFAULT_TIMEOUT_SECS,
};

/// Global service configuration.
///
/// Loaded once at startup and passed explicitly to every component that
/// needs it. Keys match the recognized environment variables lowercased
/// (`BASE_URL` -> `base_url`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Base URL of the OpenAI-compatible backend (without `/chat/completions`)
    #[serde(default)]
    pub base_url: String,

    /// Bearer token for the backend
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Model name sent with every request
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Maximum output tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout for the final unify call, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Timeout for each per-chunk call, in seconds
    #[serde(default = "default_chunk_timeout_seconds")]
    pub chunk_timeout_seconds: u64,

    /// Maximum chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Maximum concurrent chunk calls
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Total attempts per backend call, including the first
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            model_name: default_model_name(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            chunk_timeout_seconds: default_chunk_timeout_seconds(),
            chunk_size: default_chunk_size(),
            max_workers: default_max_workers(),
            retry_count: default_retry_count(),
        }
    }
}

impl DigestConfig {
    /// Load configuration from the optional file named by `DIGEST_CONFIG`
    /// and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("DIGEST_CONFIG").ok();
        Self::load_from(file.as_deref().map(Path::new), true)
    }

    /// Load configuration from an optional file, optionally overlaid with
    /// environment variables, then validate it.
    pub fn load_from(file: Option<&Path>, with_env: bool) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        if with_env {
            builder = builder.add_source(Environment::default().try_parsing(true));
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check required settings and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("BASE_URL"));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("API_KEY"));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                name: "CHUNK_SIZE",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_workers == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_WORKERS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                name: "TIMEOUT_SECONDS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.chunk_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                name: "CHUNK_TIMEOUT_SECONDS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                name: "TEMPERATURE",
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        Ok(())
    }

    /// Timeout for the final unify call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Timeout for each per-chunk call.
    pub fn chunk_timeout(&self) -> Duration {
        Duration::from_secs(self.chunk_timeout_seconds)
    }
}

fn default_model_name() -> String {
    "default-model".to_string()
}
fn default_max_tokens() -> u32 {
    500
}
fn default_temperature() -> f32 {
    0.7
}
fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_chunk_timeout_seconds() -> u64 {
    DEFAULT_CHUNK_TIMEOUT_SECS
}
fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}
fn default_retry_count() -> u32 {
    DEFAULT_RETRY_COUNT
}
