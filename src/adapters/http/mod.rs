//! HTTP adapters - web surface over the live chat session.

pub mod chat;

pub use chat::{chat_router, ChatAppState};
