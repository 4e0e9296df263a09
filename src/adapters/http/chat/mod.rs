//! HTTP adapter for the chat session: server-rendered page plus JSON API.

mod dto;
mod handlers;
mod page;
mod routes;

pub use dto::{
    ChatView, ErrorResponse, FeedbackRequest, HealthResponse, SendMessageRequest, TurnResponse,
    TurnView,
};
pub use handlers::ChatAppState;
pub use page::{PAGE_TITLE, THANK_YOU_LINE, WELCOME_LINE};
pub use routes::chat_router;
