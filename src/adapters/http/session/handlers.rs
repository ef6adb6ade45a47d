//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_body, invalid_session_id, session_error_response};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::request_metadata;
use crate::application::handlers::{
    BookSessionCommand, BookSessionHandler, CancelSessionCommand, CancelSessionHandler,
    CompleteSessionCommand, CompleteSessionHandler, ConfirmSessionCommand, ConfirmSessionHandler,
    GetSessionHandler, GetSessionQuery, JoinSessionCommand, JoinSessionHandler,
    ListUpcomingSessionsHandler, ListUpcomingSessionsQuery, RateSessionCommand,
    RateSessionHandler,
};
use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::domain::session::{CancellationPolicy, SessionError};
use crate::ports::{Clock, EventPublisher, SessionRepository, UserDirectory};

use super::dto::{
    BookSessionRequest, CancelSessionResponse, JoinSessionResponse, RateSessionRequest,
    SessionResponse, UpcomingSessionsResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    pub book: Arc<BookSessionHandler>,
    pub confirm: Arc<ConfirmSessionHandler>,
    pub complete: Arc<CompleteSessionHandler>,
    pub cancel: Arc<CancelSessionHandler>,
    pub rate: Arc<RateSessionHandler>,
    pub join: Arc<JoinSessionHandler>,
    pub list_upcoming: Arc<ListUpcomingSessionsHandler>,
    pub get: Arc<GetSessionHandler>,
}

impl SessionHandlers {
    /// Wires every session use case against the same ports.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserDirectory>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            book: Arc::new(BookSessionHandler::new(
                sessions.clone(),
                users.clone(),
                publisher.clone(),
                clock.clone(),
            )),
            confirm: Arc::new(ConfirmSessionHandler::new(
                sessions.clone(),
                publisher.clone(),
                clock.clone(),
            )),
            complete: Arc::new(CompleteSessionHandler::new(
                sessions.clone(),
                publisher.clone(),
                clock.clone(),
            )),
            cancel: Arc::new(CancelSessionHandler::new(
                sessions.clone(),
                publisher.clone(),
                clock.clone(),
                policy,
            )),
            rate: Arc::new(RateSessionHandler::new(
                sessions.clone(),
                publisher.clone(),
                clock.clone(),
            )),
            join: Arc::new(JoinSessionHandler::new(
                sessions.clone(),
                publisher,
                clock.clone(),
            )),
            list_upcoming: Arc::new(ListUpcomingSessionsHandler::new(
                sessions.clone(),
                users,
                clock,
            )),
            get: Arc::new(GetSessionHandler::new(sessions)),
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| invalid_session_id(raw))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Book a session as the learner
pub async fn book_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    payload: Result<Json<BookSessionRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body(rejection),
    };
    let instructor_id = match UserId::new(req.instructor_id) {
        Ok(id) => id,
        Err(e) => {
            return session_error_response(SessionError::validation(e.field(), e.to_string()))
        }
    };

    let cmd = BookSessionCommand {
        instructor_id,
        skill: req.skill,
        start_time: Timestamp::from_datetime(req.start_time),
        duration_minutes: req.duration_minutes,
    };

    match handlers
        .book
        .handle(cmd, request_metadata(&user, &headers))
        .await
    {
        Ok(result) => (
            StatusCode::CREATED,
            Json(SessionResponse::from(&result.session)),
        )
            .into_response(),
        Err(e) => session_error_response(e),
    }
}

/// GET /api/sessions/upcoming - Caller's pending and confirmed sessions
pub async fn list_upcoming(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = ListUpcomingSessionsQuery { user_id: user.id };

    match handlers.list_upcoming.handle(query).await {
        Ok(items) => {
            let response = UpcomingSessionsResponse {
                items: items.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => session_error_response(e),
    }
}

/// GET /api/sessions/:id - Session details for a participant
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetSessionQuery {
        session_id,
        user_id: user.id,
    };

    match handlers.get.handle(query).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/sessions/:id/confirm - Instructor accepts the booking
pub async fn confirm_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .confirm
        .handle(
            ConfirmSessionCommand { session_id },
            request_metadata(&user, &headers),
        )
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/sessions/:id/complete - Instructor marks the session held
pub async fn complete_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .complete
        .handle(
            CompleteSessionCommand { session_id },
            request_metadata(&user, &headers),
        )
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/sessions/:id/cancel - Either participant cancels
pub async fn cancel_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .cancel
        .handle(
            CancelSessionCommand { session_id },
            request_metadata(&user, &headers),
        )
        .await
    {
        Ok(result) => (StatusCode::OK, Json(CancelSessionResponse::from(result))).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/sessions/:id/rating - Learner rates a completed session
pub async fn rate_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(session_id): Path<String>,
    payload: Result<Json<RateSessionRequest>, JsonRejection>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body(rejection),
    };

    let cmd = RateSessionCommand {
        session_id,
        rating: req.rating,
        review: req.review,
    };

    match handlers
        .rate
        .handle(cmd, request_metadata(&user, &headers))
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/sessions/:id/join - Enter the meeting room
pub async fn join_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .join
        .handle(
            JoinSessionCommand { session_id },
            request_metadata(&user, &headers),
        )
        .await
    {
        Ok(result) => (StatusCode::OK, Json(JoinSessionResponse::from(result))).into_response(),
        Err(e) => session_error_response(e),
    }
}
