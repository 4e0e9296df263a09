//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Response generators (OpenAI, mock)
//! - `sentiment` - Sentiment classifiers (Hugging Face inference, mock)
//! - `http` - Axum web surface over the live chat session

pub mod ai;
pub mod http;
pub mod sentiment;
