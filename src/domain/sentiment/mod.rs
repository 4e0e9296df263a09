//! Sentiment domain module.
//!
//! The five-point sentiment scale produced by the classifier and the
//! tone directive selected from it for the next prompt.

mod label;
mod tone;

pub use label::SentimentLabel;
pub use tone::ToneDirective;
