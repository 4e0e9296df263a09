//! Response generator configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::{retry_budget, MAX_RETRIES};

/// OpenAI chat completions configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Chat model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Upper bound on one completion including retries and backoff.
    pub fn turn_deadline(&self) -> Duration {
        retry_budget(self.timeout(), self.max_retries)
    }

    /// Returns the API key when one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().is_none() {
            return Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai.timeout_secs"));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooManyRetries("ai.max_retries"));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AiConfig {
        AiConfig {
            openai_api_key: Some(Secret::new("sk-xxx".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 2);
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_turn_deadline_covers_retries() {
        // 3 attempts × 60s + 1s + 2s backoff
        assert_eq!(with_key().turn_deadline(), Duration::from_secs(183));

        let no_retry = AiConfig {
            max_retries: 0,
            ..with_key()
        };
        assert_eq!(no_retry.turn_deadline(), Duration::from_secs(60));
    }

    #[test]
    fn test_validation_missing_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))
        );

        let empty = AiConfig {
            openai_api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_validation_passes_with_key() {
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timeout_and_bad_temperature() {
        let config = AiConfig {
            timeout_secs: 0,
            ..with_key()
        };
        assert!(config.validate().is_err());

        let config = AiConfig {
            temperature: Some(3.5),
            ..with_key()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }

    #[test]
    fn test_validation_caps_retries() {
        let config = AiConfig {
            max_retries: 64,
            ..with_key()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::TooManyRetries("ai.max_retries"))
        );
        // Still computable for logging before validation runs.
        assert_eq!(config.turn_deadline(), Duration::MAX);

        let at_cap = AiConfig {
            max_retries: MAX_RETRIES,
            ..with_key()
        };
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn test_debug_hides_key() {
        assert!(!format!("{:?}", with_key()).contains("sk-xxx"));
    }
}
