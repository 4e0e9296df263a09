//! Typed settings read from the environment.
//!
//! Every key lives under the `MIND_HAVEN` prefix with `__` between levels,
//! e.g. `MIND_HAVEN__SERVER__PORT=3000` or `MIND_HAVEN__AI__OPENAI_API_KEY`.
//! A `.env` file is read first when present. Anything unset falls back to
//! the section defaults.

mod ai;
mod conversation;
mod error;
mod sentiment;
mod server;

pub use ai::AiConfig;
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use sentiment::SentimentConfig;
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

use crate::application::SessionSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Response generator (OpenAI).
    #[serde(default)]
    pub ai: AiConfig,

    /// Sentiment classifier (Hugging Face).
    #[serde(default)]
    pub sentiment: SentimentConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MIND_HAVEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks each section; the first problem wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.sentiment.validate()?;
        self.conversation.validate()?;

        let turn = self
            .sentiment
            .turn_deadline()
            .saturating_add(self.ai.turn_deadline());
        if self.server.request_timeout() <= turn {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs: self.server.request_timeout_secs,
                turn_secs: turn.as_secs(),
            });
        }
        Ok(())
    }

    /// Settings applied to every chat session.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            window: self.conversation.window(),
            classifier_timeout: self.sentiment.turn_deadline(),
            generator_timeout: self.ai.turn_deadline(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Environment variables are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MIND_HAVEN__AI__OPENAI_API_KEY",
        "MIND_HAVEN__AI__MODEL",
        "MIND_HAVEN__AI__TEMPERATURE",
        "MIND_HAVEN__SERVER__PORT",
        "MIND_HAVEN__SERVER__LOG_FORMAT",
        "MIND_HAVEN__SENTIMENT__API_TOKEN",
        "MIND_HAVEN__CONVERSATION__HISTORY_MAX_TURNS",
    ];

    fn set_minimal_env() {
        env::set_var("MIND_HAVEN__AI__OPENAI_API_KEY", "sk-test-xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_secrets_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MIND_HAVEN__SENTIMENT__API_TOKEN", "hf_xxx");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.api_key(), Some("sk-test-xxx"));
        assert_eq!(config.sentiment.api_token(), Some("hf_xxx"));
    }

    #[test]
    fn minimal_environment_validates() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))
        );
    }

    #[test]
    fn unset_values_use_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(
            config.sentiment.model,
            "nlptown/bert-base-multilingual-uncased-sentiment"
        );
        assert_eq!(config.conversation.history_max_turns, 20);
        assert_eq!(config.conversation.history_max_chars, 6000);
    }

    #[test]
    fn environment_overrides_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MIND_HAVEN__SERVER__PORT", "3000");
        env::set_var("MIND_HAVEN__SERVER__LOG_FORMAT", "json");
        env::set_var("MIND_HAVEN__AI__MODEL", "gpt-4o");
        env::set_var("MIND_HAVEN__AI__TEMPERATURE", "0.5");
        env::set_var("MIND_HAVEN__CONVERSATION__HISTORY_MAX_TURNS", "6");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.ai.model, "gpt-4o");
        assert_eq!(config.ai.temperature, Some(0.5));
        assert_eq!(config.conversation.history_max_turns, 6);
    }

    #[test]
    fn session_settings_follow_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let settings = result.unwrap().session_settings();
        assert_eq!(settings.window.max_turns, 20);
        assert_eq!(settings.classifier_timeout, Duration::from_secs(63));
        assert_eq!(settings.generator_timeout, Duration::from_secs(183));
    }

    fn with_request_timeout(secs: u64) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            },
            ai: AiConfig {
                openai_api_key: Some(secrecy::Secret::new("sk-test".to_string())),
                ..Default::default()
            },
            sentiment: SentimentConfig::default(),
            conversation: ConversationConfig::default(),
        }
    }

    #[test]
    fn request_timeout_must_outlast_a_turn() {
        // Defaults: 63s classification + 183s generation
        assert_eq!(
            with_request_timeout(30).validate(),
            Err(ValidationError::RequestTimeoutTooShort {
                request_secs: 30,
                turn_secs: 246,
            })
        );
        assert!(with_request_timeout(246).validate().is_err());
        assert!(with_request_timeout(247).validate().is_ok());
    }

    #[test]
    fn longer_retry_budget_needs_longer_request_timeout() {
        let mut config = with_request_timeout(300);
        config.ai.max_retries = 4;

        // 5 × 60s + 1 + 2 + 4 + 8 = 315s of generation alone
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RequestTimeoutTooShort { turn_secs: 378, .. })
        ));
    }
}
