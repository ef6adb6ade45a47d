//! Error bodies and status mapping shared by the HTTP adapters.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::domain::session::SessionError;

/// Standard error response: `{code, message, details?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// 400 for a path segment that is not a session id.
pub fn invalid_session_id(raw: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(
            ErrorResponse::bad_request("Invalid session ID")
                .with_details(json!({ "session_id": raw })),
        ),
    )
        .into_response()
}

/// 400 for a body axum could not parse.
pub fn invalid_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(rejection.body_text())),
    )
        .into_response()
}

/// Maps a use-case error to its status code and body.
pub fn session_error_response(error: SessionError) -> Response {
    let status = match &error {
        SessionError::InvalidDuration(_)
        | SessionError::SelfBooking
        | SessionError::InstructorNotFound(_)
        | SessionError::InvalidInstructor(_)
        | SessionError::SkillNotOffered { .. }
        | SessionError::StartTimeInPast
        | SessionError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        SessionError::NotAuthorized => StatusCode::FORBIDDEN,
        SessionError::NotFound(_) | SessionError::UserNotFound(_) => StatusCode::NOT_FOUND,
        SessionError::InvalidStatus { .. }
        | SessionError::AlreadyRated
        | SessionError::Conflict(_) => StatusCode::CONFLICT,
        SessionError::InsufficientCredits { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let details = match &error {
        SessionError::NotFound(id) | SessionError::Conflict(id) => {
            Some(json!({ "session_id": id.to_string() }))
        }
        SessionError::UserNotFound(id)
        | SessionError::InstructorNotFound(id)
        | SessionError::InvalidInstructor(id) => Some(json!({ "user_id": id.as_str() })),
        SessionError::SkillNotOffered { skill } => Some(json!({ "skill": skill })),
        SessionError::InvalidDuration(minutes) => Some(json!({ "duration_minutes": minutes })),
        SessionError::InsufficientCredits {
            required,
            available,
        } => Some(json!({ "required": required, "available": available })),
        SessionError::InvalidStatus {
            current,
            transition,
        } => Some(json!({
            "current_status": current.as_str(),
            "transition": transition.as_str(),
        })),
        SessionError::ValidationFailed { field, .. } => Some(json!({ "field": field })),
        _ => None,
    };

    let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error, "Request failed");
        ErrorResponse::new(error.code().to_string(), "Internal server error")
    } else {
        ErrorResponse::new(error.code().to_string(), error.to_string())
    };

    let body = match details {
        Some(details) => body.with_details(details),
        None => body,
    };

    (status, Json(body)).into_response()
}
