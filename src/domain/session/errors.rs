//! Session-specific error types.

use crate::domain::foundation::ErrorCode;

use super::SessionState;

/// Errors reported by a chat session.
///
/// `EmptyInput`, `NotAcceptingInput` and `InvalidFeedback` are rejected
/// before any state change. `ClassifierUnavailable` and
/// `GeneratorUnavailable` are returned after the session has already
/// recovered: the user turn and a notice turn are in the transcript and
/// the session is accepting input again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Message text cannot be empty")]
    EmptyInput,

    #[error("Session is not accepting input in state {0}")]
    NotAcceptingInput(SessionState),

    #[error("Sentiment classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Response generator unavailable: {0}")]
    GeneratorUnavailable(String),

    #[error("Feedback rejected: {0}")]
    InvalidFeedback(String),
}

impl SessionError {
    pub fn classifier_unavailable(message: impl Into<String>) -> Self {
        SessionError::ClassifierUnavailable(message.into())
    }

    pub fn generator_unavailable(message: impl Into<String>) -> Self {
        SessionError::GeneratorUnavailable(message.into())
    }

    pub fn invalid_feedback(message: impl Into<String>) -> Self {
        SessionError::InvalidFeedback(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::EmptyInput => ErrorCode::EmptyInput,
            SessionError::NotAcceptingInput(_) => ErrorCode::InvalidStateTransition,
            SessionError::ClassifierUnavailable(_) => ErrorCode::ClassifierUnavailable,
            SessionError::GeneratorUnavailable(_) => ErrorCode::GeneratorUnavailable,
            SessionError::InvalidFeedback(_) => ErrorCode::InvalidFeedback,
        }
    }

    /// Returns true for model failures the session recovered from.
    pub fn is_recovered(&self) -> bool {
        matches!(
            self,
            SessionError::ClassifierUnavailable(_) | SessionError::GeneratorUnavailable(_)
        )
    }
}
