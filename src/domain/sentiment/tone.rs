//! Tone directive selected from the sentiment of the latest utterance.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SentimentLabel;

/// Style instruction inserted into the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneDirective {
    Comforting,
    Neutral,
    Encouraging,
}

impl ToneDirective {
    /// Selects the tone for a sentiment label.
    pub fn for_sentiment(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::VeryNegative | SentimentLabel::Negative => ToneDirective::Comforting,
            SentimentLabel::Neutral => ToneDirective::Neutral,
            SentimentLabel::Positive | SentimentLabel::VeryPositive => ToneDirective::Encouraging,
        }
    }

    /// Returns the phrase substituted into the prompt template.
    pub fn instruction(&self) -> &'static str {
        match self {
            ToneDirective::Comforting => "a comforting and empathetic tone",
            ToneDirective::Neutral => "a neutral and empathetic tone",
            ToneDirective::Encouraging => "an encouraging and warm tone",
        }
    }
}

impl From<SentimentLabel> for ToneDirective {
    fn from(label: SentimentLabel) -> Self {
        Self::for_sentiment(label)
    }
}

impl fmt::Display for ToneDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.instruction())
    }
}
