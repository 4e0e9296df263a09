//! HTTP routes for the chat page and API.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    end_chat, get_chat, health, new_chat, post_end_form, post_feedback_form, post_message_form,
    post_new_form, send_message, show_page, submit_feedback, ChatAppState,
};

/// Creates the chat router with all endpoints.
pub fn chat_router(state: ChatAppState) -> Router {
    Router::new()
        .route("/", get(show_page))
        .route("/chat/message", post(post_message_form))
        .route("/chat/end", post(post_end_form))
        .route("/chat/feedback", post(post_feedback_form))
        .route("/chat/new", post(post_new_form))
        .route("/api/chat", get(get_chat))
        .route("/api/chat/messages", post(send_message))
        .route("/api/chat/end", post(end_chat))
        .route("/api/chat/feedback", post(submit_feedback))
        .route("/api/chat/new", post(new_chat))
        .route("/health", get(health))
        .with_state(state)
}
