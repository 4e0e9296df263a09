//! SessionState enum for tracking the lifecycle of a chat session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingInput,
    Processing,
    SessionEnded,
}

impl SessionState {
    /// Returns true if the session accepts new user text.
    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionState::AwaitingInput)
    }

    /// Returns true once the chat has been ended.
    pub fn is_ended(&self) -> bool {
        matches!(self, SessionState::SessionEnded)
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Idle, AwaitingInput)
                | (AwaitingInput, Processing)
                | (Processing, AwaitingInput)
                | (AwaitingInput, SessionEnded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Idle => vec![AwaitingInput],
            AwaitingInput => vec![Processing, SessionEnded],
            Processing => vec![AwaitingInput],
            SessionEnded => vec![],
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "Idle",
            SessionState::AwaitingInput => "AwaitingInput",
            SessionState::Processing => "Processing",
            SessionState::SessionEnded => "SessionEnded",
        };
        write!(f, "{}", s)
    }
}
