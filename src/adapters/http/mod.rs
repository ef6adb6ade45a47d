//! HTTP adapters - REST API implementations.
//!
//! Each use-case area has its own HTTP adapter for endpoint exposure:
//! - `session` - Booking lifecycle under `/api/sessions`
//! - `credits` - Balance lookup under `/api/credits`

pub mod credits;
pub mod error;
pub mod middleware;
pub mod session;

use axum::{
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::domain::foundation::{AuthenticatedUser, CommandMetadata};

pub use credits::{credit_routes, CreditHandlers};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use session::{session_routes, SessionHandlers};

/// Header carrying the caller-supplied correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds command metadata for an authenticated HTTP request.
///
/// The correlation id is taken from `x-request-id` when present, otherwise
/// one is generated when the metadata is first read.
pub fn request_metadata(user: &AuthenticatedUser, headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new(user.id.clone()).with_source("http");

    match headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        Some(request_id) => metadata.with_correlation_id(request_id),
        None => metadata,
    }
}

/// Everything the router needs, already wired against concrete ports.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub sessions: SessionHandlers,
    pub credits: CreditHandlers,
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Assembles the full API.
///
/// ```text
/// GET  /health
/// /api/sessions/...   (bearer token)
/// /api/credits/...    (bearer token)
/// ```
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/sessions", session_routes(state.sessions))
        .nest("/credits", credit_routes(state.credits))
        .layer(from_fn_with_state(state.auth, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}
