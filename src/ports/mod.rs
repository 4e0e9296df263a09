//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Model Ports
//!
//! - `SentimentClassifier` - Scores a user utterance on the five-point scale
//! - `ResponseGenerator` - Produces the assistant reply for a composed prompt
//!
//! Both adapters retry on the schedule in [`retry_backoff`].

mod response_generator;
mod retry;
mod sentiment_classifier;

pub use response_generator::{
    AIError, CompletionRequest, CompletionResponse, FinishReason, Message, ProviderInfo,
    RequestMetadata, ResponseGenerator, TokenUsage,
};
pub use retry::{retry_backoff, retry_budget, MAX_RETRIES};
pub use sentiment_classifier::{ClassifierError, SentimentClassifier};
