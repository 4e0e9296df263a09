use thiserror::Error;

/// Environment could not be read into [`AppConfig`](super::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// A loaded value is out of range or missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required setting MIND_HAVEN__{0}")]
    MissingRequired(&'static str),

    #[error("invalid bind address {0}")]
    InvalidAddress(String),

    #[error("port must be non-zero")]
    InvalidPort,

    #[error("{0} is out of range")]
    InvalidTimeout(&'static str),

    #[error("{0} exceeds the retry limit")]
    TooManyRetries(&'static str),

    #[error("server.request_timeout_secs ({request_secs}s) must exceed one chat turn ({turn_secs}s)")]
    RequestTimeoutTooShort { request_secs: u64, turn_secs: u64 },

    #[error("history window must allow at least one turn and one character")]
    InvalidHistoryWindow,

    #[error("temperature must be between 0.0 and 2.0")]
    InvalidTemperature,
}
