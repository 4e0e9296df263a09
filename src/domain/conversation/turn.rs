//! Turn entity for conversations.
//!
//! Turns are immutable records of user/assistant utterances within a session.
//! Each turn has a role, non-empty text, and a creation timestamp.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person chatting.
    User,
    /// The language model (or a notice standing in for its reply).
    Assistant,
}

impl Role {
    /// Returns the lowercase name used in serialized history.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable utterance within a conversation.
///
/// # Invariants
///
/// - `text` is non-empty and not whitespace-only (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    text: String,
    created_at: Timestamp,
}

impl Turn {
    /// Creates a new turn with the given role and text.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if text is empty or whitespace-only
    pub fn new(role: Role, text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }

        Ok(Self {
            role,
            text,
            created_at: Timestamp::now(),
        })
    }

    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Role::User, text)
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Role::Assistant, text)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the turn was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this turn is from the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Returns true if this turn is from the assistant.
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Renders the turn as a `role: text` history line.
    pub fn history_line(&self) -> String {
        format!("{}: {}", self.role, self.text)
    }
}
