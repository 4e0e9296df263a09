//! Conversation domain module.
//!
//! Holds the turn-by-turn transcript of a session and turns it, together
//! with a tone directive and the new utterance, into a model-ready prompt.

mod prompt;
mod store;
mod turn;
mod window;

pub use prompt::{PromptComposer, PromptTemplate, TemplateError, DEFAULT_TEMPLATE};
pub use store::{ConversationStore, HistoryLines};
pub use turn::{Role, Turn};
pub use window::{BoundedHistory, HistoryWindow};
