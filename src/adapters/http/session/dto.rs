//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::handlers::{CancelSessionResult, JoinSessionResult, UpcomingSession};
use crate::domain::session::Session;
use crate::domain::user::UserContact;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to book a session with an instructor.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSessionRequest {
    pub instructor_id: String,
    pub skill: String,
    /// RFC 3339.
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Request to rate a completed session.
#[derive(Debug, Clone, Deserialize)]
pub struct RateSessionRequest {
    pub rating: i64,
    #[serde(default)]
    pub review: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Detailed session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub instructor_id: String,
    pub learner_id: String,
    pub skill: String,
    pub start_time: String,
    pub duration_minutes: u32,
    pub credits: u32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            instructor_id: session.instructor_id().to_string(),
            learner_id: session.learner_id().to_string(),
            skill: session.skill().to_string(),
            start_time: session.start_time().as_datetime().to_rfc3339(),
            duration_minutes: session.duration_minutes(),
            credits: session.credits(),
            status: session.status().as_str().to_string(),
            meeting_room: session.meeting_room().map(|r| r.to_string()),
            rating: session.rating().map(|r| r.value()),
            review: session.review().map(str::to_string),
            created_at: session.created_at().as_datetime().to_rfc3339(),
            updated_at: session.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Contact card of the other participant.
#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserContact> for ContactResponse {
    fn from(contact: UserContact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.name,
            email: contact.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingSessionResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    /// Caller's side of the session.
    pub role: String,
    pub counterpart: ContactResponse,
}

impl From<UpcomingSession> for UpcomingSessionResponse {
    fn from(upcoming: UpcomingSession) -> Self {
        Self {
            session: SessionResponse::from(&upcoming.session),
            role: upcoming.role.as_str().to_string(),
            counterpart: upcoming.counterpart.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingSessionsResponse {
    pub items: Vec<UpcomingSessionResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelSessionResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub refunded: u32,
    pub forfeited: u32,
}

impl From<CancelSessionResult> for CancelSessionResponse {
    fn from(result: CancelSessionResult) -> Self {
        Self {
            session: SessionResponse::from(&result.session),
            refunded: result.outcome.refunded(),
            forfeited: result.outcome.forfeited(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinSessionResponse {
    pub session_id: String,
    pub meeting_room: String,
    pub role: String,
}

impl From<JoinSessionResult> for JoinSessionResponse {
    fn from(result: JoinSessionResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            meeting_room: result.meeting_room.to_string(),
            role: result.role.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_request_parses_rfc3339_start() {
        let json = r#"{
            "instructor_id": "inst-1",
            "skill": "Rust",
            "start_time": "2026-03-12T14:00:00+01:00",
            "duration_minutes": 45
        }"#;

        let req: BookSessionRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.start_time.to_rfc3339(), "2026-03-12T13:00:00+00:00");
        assert_eq!(req.duration_minutes, 45);
    }

    #[test]
    fn rate_request_review_is_optional() {
        let req: RateSessionRequest = serde_json::from_str(r#"{"rating": 4}"#).unwrap();
        assert_eq!(req.rating, 4);
        assert!(req.review.is_none());
    }
}
