//! AI Provider Adapters.
//!
//! Implementations of the ResponseGenerator port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI chat completions (gpt-4o-mini by default)
//! - `MockAIProvider` - Configurable mock for testing

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockError};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
