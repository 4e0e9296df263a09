//! Sentiment Classifier Port - Interface for hosted sentiment models.
//!
//! The session controller asks the classifier for the polarity of each user
//! utterance before choosing a tone. A classifier that cannot produce a label
//! must fail; it never returns a guess.

use async_trait::async_trait;

use crate::domain::sentiment::SentimentLabel;

/// Port for sentiment classification of a single utterance.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify the text on the five-point scale.
    async fn classify(&self, text: &str) -> Result<SentimentLabel, ClassifierError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Sentiment classifier errors.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Classifier answered but with no labels.
    #[error("classifier returned no result")]
    EmptyResult,

    /// Classifier returned a label outside the five-point scale.
    #[error("unrecognized sentiment label '{0}'")]
    UnknownLabel(String),

    /// Rate limited by provider.
    #[error("rate limited")]
    RateLimited,

    /// Provider is unavailable (outage, model still loading).
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// API token rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl ClassifierError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClassifierError::RateLimited
                | ClassifierError::Unavailable(_)
                | ClassifierError::Network(_)
                | ClassifierError::Timeout { .. }
        )
    }
}
