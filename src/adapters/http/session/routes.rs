//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    book_session, cancel_session, complete_session, confirm_session, get_session, join_session,
    list_upcoming, rate_session, SessionHandlers,
};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(book_session))
        .route("/upcoming", get(list_upcoming))
        .route("/:id", get(get_session))
        .route("/:id/confirm", post(confirm_session))
        .route("/:id/complete", post(complete_session))
        .route("/:id/cancel", post(cancel_session))
        .route("/:id/rating", post(rate_session))
        .route("/:id/join", post(join_session))
        .with_state(handlers)
}
