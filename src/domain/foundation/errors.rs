//! Domain validation errors and client-facing error codes.

use std::fmt;
use thiserror::Error;

/// Rejected input to a domain constructor or parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyInput,
    InvalidStateTransition,
    InvalidFeedback,
    ClassifierUnavailable,
    GeneratorUnavailable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCode::EmptyInput => "EMPTY_INPUT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::InvalidFeedback => "INVALID_FEEDBACK",
            ErrorCode::ClassifierUnavailable => "CLASSIFIER_UNAVAILABLE",
            ErrorCode::GeneratorUnavailable => "GENERATOR_UNAVAILABLE",
        })
    }
}
