//! Conversation history configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::conversation::HistoryWindow;

/// Bounds on the history interpolated into each prompt
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    #[serde(default = "default_max_turns")]
    pub history_max_turns: usize,

    #[serde(default = "default_max_chars")]
    pub history_max_chars: usize,
}

impl ConversationConfig {
    pub fn window(&self) -> HistoryWindow {
        HistoryWindow::new(self.history_max_turns, self.history_max_chars)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_max_turns == 0 || self.history_max_chars == 0 {
            return Err(ValidationError::InvalidHistoryWindow);
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_max_turns: default_max_turns(),
            history_max_chars: default_max_chars(),
        }
    }
}

fn default_max_turns() -> usize {
    20
}

fn default_max_chars() -> usize {
    6000
}
