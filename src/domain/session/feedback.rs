//! End-of-session feedback rating.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Satisfaction rating offered after the chat ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRating {
    VerySatisfied,
    Satisfied,
    Neutral,
    Dissatisfied,
    VeryDissatisfied,
}

impl FeedbackRating {
    /// All ratings in the order they are offered.
    pub const ALL: [FeedbackRating; 5] = [
        FeedbackRating::VerySatisfied,
        FeedbackRating::Satisfied,
        FeedbackRating::Neutral,
        FeedbackRating::Dissatisfied,
        FeedbackRating::VeryDissatisfied,
    ];

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackRating::VerySatisfied => "Very Satisfied",
            FeedbackRating::Satisfied => "Satisfied",
            FeedbackRating::Neutral => "Neutral",
            FeedbackRating::Dissatisfied => "Dissatisfied",
            FeedbackRating::VeryDissatisfied => "Very Dissatisfied",
        }
    }
}

impl FromStr for FeedbackRating {
    type Err = ValidationError;

    /// Accepts the display label ("Very Satisfied") or its snake_case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|rating| {
                rating.label().eq_ignore_ascii_case(wanted)
                    || rating.label().replace(' ', "_").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                ValidationError::invalid_format("rating", format!("unknown rating '{}'", s))
            })
    }
}

impl fmt::Display for FeedbackRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Holds at most one rating per session; once filled it never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackSlot(Option<FeedbackRating>);

impl FeedbackSlot {
    /// Records the rating if the slot is empty.
    ///
    /// Returns `false`, leaving the slot untouched, if a rating is already
    /// recorded.
    pub fn record(&mut self, rating: FeedbackRating) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(rating);
        true
    }

    /// Returns the recorded rating, if any.
    pub fn get(&self) -> Option<FeedbackRating> {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}
