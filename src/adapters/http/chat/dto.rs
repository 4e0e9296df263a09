//! Request and response types for the chat endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{SessionController, TurnOutcome};
use crate::domain::conversation::{Role, Turn};
use crate::domain::sentiment::{SentimentLabel, ToneDirective};
use crate::domain::session::{SessionError, SessionState};

use super::page::THANK_YOU_LINE;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/chat/messages` and the message form.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub text: String,
}

/// Body of `POST /api/chat/feedback` and the rating form.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub rating: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnView {
    pub role: Role,
    pub text: String,
    pub created_at: String,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role(),
            text: turn.text().to_string(),
            created_at: turn.created_at().to_string(),
        }
    }
}

/// Snapshot of the live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatView {
    pub session_id: String,
    pub state: SessionState,
    pub turns: Vec<TurnView>,
    /// Recorded rating label, once given.
    pub feedback: Option<String>,
    /// Thank-you text, present on the first view after feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledgment: Option<String>,
}

impl ChatView {
    /// Builds the view, consuming the pending acknowledgment.
    pub fn capture(session: &mut SessionController) -> Self {
        let acknowledgment = session
            .take_acknowledgment()
            .then(|| THANK_YOU_LINE.to_string());

        Self {
            session_id: session.id().to_string(),
            state: session.state(),
            turns: session.all_turns().iter().map(TurnView::from).collect(),
            feedback: session.feedback().map(|r| r.label().to_string()),
            acknowledgment,
        }
    }
}

/// Response to a submitted message.
///
/// A recovered model failure still answers 200: the transcript holds the
/// notice turn and `error` says what went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub session: ChatView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<ToneDirective>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl TurnResponse {
    pub fn completed(session: ChatView, outcome: &TurnOutcome) -> Self {
        Self {
            session,
            sentiment: Some(outcome.sentiment),
            tone: Some(outcome.tone),
            error: None,
        }
    }

    pub fn recovered(session: ChatView, error: &SessionError) -> Self {
        Self {
            session,
            sentiment: None,
            tone: None,
            error: Some(ErrorResponse::from_session_error(error)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    /// Maps a session error to a client-safe body; provider detail stays in the logs.
    pub fn from_session_error(error: &SessionError) -> Self {
        let message = match error {
            SessionError::ClassifierUnavailable(_) => {
                "Sentiment analysis is unavailable right now; please try again.".to_string()
            }
            SessionError::GeneratorUnavailable(_) => {
                "The assistant could not respond right now; please try again.".to_string()
            }
            other => other.to_string(),
        };

        Self {
            code: error.code().to_string(),
            message,
        }
    }
}
