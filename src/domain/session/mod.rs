//! Session domain module.
//!
//! Lifecycle states of a chat session, the set-once feedback rating,
//! and the errors a session reports to the presentation layer.

mod errors;
mod feedback;
mod state;

pub use errors::SessionError;
pub use feedback::{FeedbackRating, FeedbackSlot};
pub use state::SessionState;
