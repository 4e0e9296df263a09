//! Sentiment classifier configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::{retry_budget, MAX_RETRIES};

/// Hugging Face inference configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentConfig {
    /// Inference API token; public models work without one
    pub api_token: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl SentimentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Upper bound on one classification including retries and backoff.
    pub fn turn_deadline(&self) -> Duration {
        retry_budget(self.timeout(), self.max_retries)
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token
            .as_ref()
            .map(|t| t.expose_secret().as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SENTIMENT__MODEL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("sentiment.timeout_secs"));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooManyRetries("sentiment.max_retries"));
        }
        Ok(())
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "nlptown/bert-base-multilingual-uncased-sentiment".to_string()
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_timeout() -> u64 {
    20
}

fn default_retries() -> u32 {
    2
}
