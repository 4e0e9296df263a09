//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `sentiment` - Sentiment scale and the tone directive derived from it
//! - `conversation` - Turns, the conversation store, and prompt composition
//! - `session` - Session lifecycle, feedback, and session errors

pub mod conversation;
pub mod foundation;
pub mod sentiment;
pub mod session;
