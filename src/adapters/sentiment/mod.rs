//! Sentiment Classifier Adapters.
//!
//! - `HuggingFaceClassifier` - Hosted inference over a star-rating model
//! - `MockClassifier` - Scripted labels for testing

mod huggingface_classifier;
mod mock_classifier;

pub use huggingface_classifier::{HuggingFaceClassifier, HuggingFaceConfig};
pub use mock_classifier::MockClassifier;
