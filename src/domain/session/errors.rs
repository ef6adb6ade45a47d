//! Session-specific error types.

use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, SessionStatus, UserId};

/// Lifecycle operation that was attempted on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionTransition {
    Confirm,
    Complete,
    Cancel,
    Rate,
    Join,
}

impl SessionTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionTransition::Confirm => "confirm",
            SessionTransition::Complete => "complete",
            SessionTransition::Cancel => "cancel",
            SessionTransition::Rate => "rate",
            SessionTransition::Join => "join",
        }
    }
}

impl fmt::Display for SessionTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by the session use cases.
///
/// Not-found and not-authorized stay distinct all the way to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Instructor not found: {0}")]
    InstructorNotFound(UserId),

    #[error("User {0} is not an instructor")]
    InvalidInstructor(UserId),

    #[error("A user cannot book a session with themselves")]
    SelfBooking,

    #[error("Instructor does not offer a verified '{skill}' skill")]
    SkillNotOffered { skill: String },

    #[error("Invalid session duration: {0} minutes")]
    InvalidDuration(i64),

    #[error("Session start time must be in the future")]
    StartTimeInPast,

    #[error("Required {required} credits but only {available} available")]
    InsufficientCredits { required: u32, available: u32 },

    #[error("User is not authorized to perform this action on the session")]
    NotAuthorized,

    #[error("Cannot {transition} a session that is {current}")]
    InvalidStatus {
        current: SessionStatus,
        transition: SessionTransition,
    },

    #[error("Session has already been rated")]
    AlreadyRated,

    #[error("Session {0} was modified concurrently; reload and retry")]
    Conflict(SessionId),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl SessionError {
    pub fn invalid_status(current: SessionStatus, transition: SessionTransition) -> Self {
        SessionError::InvalidStatus {
            current,
            transition,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::UserNotFound(_) => ErrorCode::UserNotFound,
            SessionError::InstructorNotFound(_) => ErrorCode::InstructorNotFound,
            SessionError::InvalidInstructor(_) => ErrorCode::InvalidInstructor,
            SessionError::SelfBooking => ErrorCode::SelfBooking,
            SessionError::SkillNotOffered { .. } => ErrorCode::SkillNotOffered,
            SessionError::InvalidDuration(_) => ErrorCode::InvalidDuration,
            SessionError::StartTimeInPast => ErrorCode::StartTimeInPast,
            SessionError::InsufficientCredits { .. } => ErrorCode::InsufficientCredits,
            SessionError::NotAuthorized => ErrorCode::Forbidden,
            SessionError::InvalidStatus { .. } => ErrorCode::InvalidStateTransition,
            SessionError::AlreadyRated => ErrorCode::AlreadyRated,
            SessionError::Conflict(_) => ErrorCode::ConcurrentModification,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

/// Store-side rejection of `transition` because the session is now `current`.
///
/// Converts back into `SessionError::InvalidStatus`.
pub fn transition_rejected(
    id: &SessionId,
    current: SessionStatus,
    transition: SessionTransition,
) -> DomainError {
    DomainError::new(
        ErrorCode::InvalidStateTransition,
        format!("Cannot {} a session that is {}", transition, current),
    )
    .with_detail("session_id", id.to_string())
    .with_detail("current_status", current.as_str())
    .with_detail("transition", transition.as_str())
}

/// Port errors carry identifiers in `details`; every code maps to its own
/// variant and falls back to `Infrastructure` only when the detail is missing.
impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        let session_id = err
            .details
            .get("session_id")
            .and_then(|s| s.parse::<SessionId>().ok());
        let user_id = err
            .details
            .get("user_id")
            .and_then(|s| UserId::new(s.as_str()).ok());
        let current = err
            .details
            .get("current_status")
            .and_then(|s| s.parse::<SessionStatus>().ok());

        match (err.code, session_id, user_id, current) {
            (ErrorCode::SessionNotFound, Some(id), _, _) => SessionError::NotFound(id),
            (ErrorCode::ConcurrentModification, Some(id), _, _) => SessionError::Conflict(id),
            (ErrorCode::UserNotFound, _, Some(user), _) => SessionError::UserNotFound(user),
            (ErrorCode::InvalidStateTransition, _, _, Some(current)) => {
                let transition = err
                    .details
                    .get("transition")
                    .and_then(|t| parse_transition(t));
                match transition {
                    Some(transition) => SessionError::invalid_status(current, transition),
                    None => SessionError::Infrastructure(err.to_string()),
                }
            }
            (ErrorCode::InsufficientCredits, _, _, _) => SessionError::InsufficientCredits {
                required: err.detail_u32("required").unwrap_or_default(),
                available: err.detail_u32("available").unwrap_or_default(),
            },
            (ErrorCode::AlreadyRated, _, _, _) => SessionError::AlreadyRated,
            (ErrorCode::Forbidden, _, _, _) | (ErrorCode::Unauthorized, _, _, _) => {
                SessionError::NotAuthorized
            }
            (ErrorCode::ValidationFailed, _, _, _) => SessionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}

fn parse_transition(s: &str) -> Option<SessionTransition> {
    match s {
        "confirm" => Some(SessionTransition::Confirm),
        "complete" => Some(SessionTransition::Complete),
        "cancel" => Some(SessionTransition::Cancel),
        "rate" => Some(SessionTransition::Rate),
        "join" => Some(SessionTransition::Join),
        _ => None,
    }
}
