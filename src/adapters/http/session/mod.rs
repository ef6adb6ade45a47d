//! HTTP adapter for session endpoints.
//!
//! - `POST /api/sessions` - Book a session
//! - `GET /api/sessions/upcoming` - Caller's upcoming sessions
//! - `GET /api/sessions/:id` - Session details
//! - `POST /api/sessions/:id/{confirm,complete,cancel,rating,join}` - Lifecycle

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BookSessionRequest, CancelSessionResponse, ContactResponse, JoinSessionResponse,
    RateSessionRequest, SessionResponse, UpcomingSessionResponse, UpcomingSessionsResponse,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
