//! Five-point sentiment scale for user utterances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Polarity of a user utterance, most negative first.
///
/// The hosted classifier reports these as star ratings ("1 star" through
/// "5 stars"); [`FromStr`] accepts that form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLabel {
    /// All labels in scale order.
    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::VeryNegative,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
        SentimentLabel::VeryPositive,
    ];

    /// Creates a label from a star count (1..=5).
    pub fn from_stars(stars: u8) -> Result<Self, ValidationError> {
        match stars {
            1 => Ok(SentimentLabel::VeryNegative),
            2 => Ok(SentimentLabel::Negative),
            3 => Ok(SentimentLabel::Neutral),
            4 => Ok(SentimentLabel::Positive),
            5 => Ok(SentimentLabel::VeryPositive),
            _ => Err(ValidationError::invalid_format(
                "sentiment_label",
                format!("star count {} is outside 1..=5", stars),
            )),
        }
    }

    /// Returns the star count for this label.
    pub fn stars(&self) -> u8 {
        match self {
            SentimentLabel::VeryNegative => 1,
            SentimentLabel::Negative => 2,
            SentimentLabel::Neutral => 3,
            SentimentLabel::Positive => 4,
            SentimentLabel::VeryPositive => 5,
        }
    }
}

impl FromStr for SentimentLabel {
    type Err = ValidationError;

    /// Parses "1 star", "2 stars", ... as reported by the classifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let count = trimmed
            .strip_suffix(" stars")
            .or_else(|| trimmed.strip_suffix(" star"))
            .and_then(|n| n.trim().parse::<u8>().ok())
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "sentiment_label",
                    format!("unrecognized label '{}'", s),
                )
            })?;
        Self::from_stars(count)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stars = self.stars();
        if stars == 1 {
            write!(f, "1 star")
        } else {
            write!(f, "{} stars", stars)
        }
    }
}
