//! HTTP handlers for the chat page and JSON API.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use tokio::sync::Mutex;

use crate::application::{SessionController, SessionFactory};
use crate::domain::session::{FeedbackRating, SessionError};

use super::dto::{
    ChatView, ErrorResponse, FeedbackRequest, HealthResponse, SendMessageRequest, TurnResponse,
};
use super::page;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state: the live session and the factory that replaces it.
///
/// The mutex is held across a whole turn, so one turn runs at a time.
#[derive(Clone)]
pub struct ChatAppState {
    factory: SessionFactory,
    session: Arc<Mutex<SessionController>>,
}

impl ChatAppState {
    pub fn new(factory: SessionFactory) -> Self {
        let session = factory.open();
        Self {
            factory,
            session: Arc::new(Mutex::new(session)),
        }
    }

    async fn replace_session(&self) -> tokio::sync::MutexGuard<'_, SessionController> {
        let mut session = self.session.lock().await;
        *session = self.factory.open();
        session
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Page handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET / - Render the chat page
pub async fn show_page(State(state): State<ChatAppState>) -> Html<String> {
    let mut session = state.session.lock().await;
    let show_thank_you = session.take_acknowledgment();
    Html(page::render(&session, show_thank_you))
}

/// POST /chat/message - Form submit of a user message
pub async fn post_message_form(
    State(state): State<ChatAppState>,
    Form(req): Form<SendMessageRequest>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(e) = session.submit_text(&req.text).await {
        // Recovered failures are already visible as the notice turn.
        tracing::debug!(error = %e, "Message form submission not answered");
    }
    Redirect::to("/")
}

/// POST /chat/end - Form submit of "End Chat"
pub async fn post_end_form(State(state): State<ChatAppState>) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(e) = session.end_session() {
        tracing::debug!(error = %e, "End chat ignored");
    }
    Redirect::to("/")
}

/// POST /chat/feedback - Form submit of the rating
pub async fn post_feedback_form(
    State(state): State<ChatAppState>,
    Form(req): Form<FeedbackRequest>,
) -> Redirect {
    let mut session = state.session.lock().await;
    match req.rating.parse::<FeedbackRating>() {
        Ok(rating) => {
            if let Err(e) = session.submit_feedback(rating) {
                tracing::debug!(error = %e, "Feedback form ignored");
            }
        }
        Err(e) => tracing::debug!(error = %e, "Feedback form carried no valid rating"),
    }
    Redirect::to("/")
}

/// POST /chat/new - Form submit of "Start a new chat"
pub async fn post_new_form(State(state): State<ChatAppState>) -> Redirect {
    let session = state.replace_session().await;
    tracing::info!(session_id = %session.id(), "New chat opened");
    Redirect::to("/")
}

// ════════════════════════════════════════════════════════════════════════════
// JSON handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/chat - Current session view
pub async fn get_chat(State(state): State<ChatAppState>) -> Response {
    let mut session = state.session.lock().await;
    (StatusCode::OK, Json(ChatView::capture(&mut session))).into_response()
}

/// POST /api/chat/messages - Submit a user message
pub async fn send_message(
    State(state): State<ChatAppState>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let mut session = state.session.lock().await;

    match session.submit_text(&req.text).await {
        Ok(outcome) => {
            let response = TurnResponse::completed(ChatView::capture(&mut session), &outcome);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) if e.is_recovered() => {
            let response = TurnResponse::recovered(ChatView::capture(&mut session), &e);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/chat/end - End the session
pub async fn end_chat(State(state): State<ChatAppState>) -> Response {
    let mut session = state.session.lock().await;

    match session.end_session() {
        Ok(()) => (StatusCode::OK, Json(ChatView::capture(&mut session))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/chat/feedback - Record the rating
pub async fn submit_feedback(
    State(state): State<ChatAppState>,
    Json(req): Json<FeedbackRequest>,
) -> Response {
    let rating = match req.rating.parse::<FeedbackRating>() {
        Ok(rating) => rating,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    let mut session = state.session.lock().await;
    match session.submit_feedback(rating) {
        Ok(()) => (StatusCode::OK, Json(ChatView::capture(&mut session))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/chat/new - Replace the session with a fresh one
pub async fn new_chat(State(state): State<ChatAppState>) -> Response {
    let mut session = state.replace_session().await;
    tracing::info!(session_id = %session.id(), "New chat opened");
    (StatusCode::CREATED, Json(ChatView::capture(&mut session))).into_response()
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_session_error(error: SessionError) -> Response {
    let status = match &error {
        SessionError::EmptyInput => StatusCode::BAD_REQUEST,
        SessionError::NotAcceptingInput(_) | SessionError::InvalidFeedback(_) => {
            StatusCode::CONFLICT
        }
        SessionError::ClassifierUnavailable(_) | SessionError::GeneratorUnavailable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(ErrorResponse::from_session_error(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::SessionState;

    #[test]
    fn empty_input_maps_to_400() {
        let response = handle_session_error(SessionError::EmptyInput);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_accepting_input_maps_to_409() {
        let response =
            handle_session_error(SessionError::NotAcceptingInput(SessionState::SessionEnded));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_feedback_maps_to_409() {
        let response = handle_session_error(SessionError::invalid_feedback("twice"));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
