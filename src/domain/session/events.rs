//! Session domain events.
//!
//! Published after the change they describe has been committed:
//! - `SessionBooked` - Learner booked a session, credits reserved
//! - `SessionConfirmed` - Instructor accepted the booking
//! - `SessionCompleted` - Session held, credits settled to the instructor
//! - `SessionCancelled` - Session cancelled, credits refunded or forfeited
//! - `SessionRated` - Learner attached a rating
//! - `MeetingRoomAssigned` - First join created the meeting room

use serde::{Deserialize, Serialize};

use super::{CancellationOutcome, ParticipantRole, Session};
use crate::domain::foundation::{
    domain_event, EventId, MeetingRoomId, Rating, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::user::UserContact;

// ════════════════════════════════════════════════════════════════════════════
// SessionBooked
// ════════════════════════════════════════════════════════════════════════════

/// Published when a learner books a session.
///
/// Carries both participants' contact cards so notification handlers do not
/// need to look them up again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBooked {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub instructor: UserContact,
    pub learner: UserContact,
    pub skill: String,
    pub start_time: Timestamp,
    pub duration_minutes: u32,
    /// Credits reserved from the learner.
    pub credits: u32,
    pub booked_at: Timestamp,
}

impl SessionBooked {
    pub fn new(session: &Session, instructor: UserContact, learner: UserContact) -> Self {
        Self {
            event_id: EventId::new(),
            session_id: *session.id(),
            instructor,
            learner,
            skill: session.skill().to_string(),
            start_time: *session.start_time(),
            duration_minutes: session.duration_minutes(),
            credits: session.credits(),
            booked_at: *session.created_at(),
        }
    }
}

domain_event!(
    SessionBooked,
    event_type = "session.booked.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = booked_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionConfirmed
// ════════════════════════════════════════════════════════════════════════════

/// Published when the instructor confirms a pending session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfirmed {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub instructor_id: UserId,
    pub learner_id: UserId,
    pub skill: String,
    pub start_time: Timestamp,
    pub confirmed_at: Timestamp,
}

impl SessionConfirmed {
    pub fn new(session: &Session) -> Self {
        Self {
            event_id: EventId::new(),
            session_id: *session.id(),
            instructor_id: session.instructor_id().clone(),
            learner_id: session.learner_id().clone(),
            skill: session.skill().to_string(),
            start_time: *session.start_time(),
            confirmed_at: *session.updated_at(),
        }
    }
}

domain_event!(
    SessionConfirmed,
    event_type = "session.confirmed.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = confirmed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Published when the instructor completes a session and is paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCompleted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub instructor_id: UserId,
    pub learner_id: UserId,
    /// Credits transferred to the instructor.
    pub credits_settled: u32,
    pub completed_at: Timestamp,
}

impl SessionCompleted {
    pub fn new(session: &Session) -> Self {
        Self {
            event_id: EventId::new(),
            session_id: *session.id(),
            instructor_id: session.instructor_id().clone(),
            learner_id: session.learner_id().clone(),
            credits_settled: session.credits(),
            completed_at: *session.updated_at(),
        }
    }
}

domain_event!(
    SessionCompleted,
    event_type = "session.completed.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionCancelled
// ════════════════════════════════════════════════════════════════════════════

/// Published when a participant cancels a session.
///
/// Exactly one of `refunded` and `forfeited` is non-zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCancelled {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub instructor_id: UserId,
    pub learner_id: UserId,
    pub cancelled_by: UserId,
    pub cancelled_by_role: ParticipantRole,
    pub previous_status: SessionStatus,
    pub start_time: Timestamp,
    pub refunded: u32,
    pub forfeited: u32,
    pub cancelled_at: Timestamp,
}

impl SessionCancelled {
    pub fn new(session: &Session, actor: &UserId, outcome: &CancellationOutcome) -> Self {
        Self {
            event_id: EventId::new(),
            session_id: *session.id(),
            instructor_id: session.instructor_id().clone(),
            learner_id: session.learner_id().clone(),
            cancelled_by: actor.clone(),
            cancelled_by_role: outcome.cancelled_by,
            previous_status: outcome.previous_status,
            start_time: *session.start_time(),
            refunded: outcome.refunded(),
            forfeited: outcome.forfeited(),
            cancelled_at: *session.updated_at(),
        }
    }
}

domain_event!(
    SessionCancelled,
    event_type = "session.cancelled.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = cancelled_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionRated
// ════════════════════════════════════════════════════════════════════════════

/// Published when the learner rates a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub instructor_id: UserId,
    pub learner_id: UserId,
    pub rating: Rating,
    pub has_review: bool,
    pub rated_at: Timestamp,
}

impl SessionRated {
    pub fn new(session: &Session, rating: Rating) -> Self {
        Self {
            event_id: EventId::new(),
            session_id: *session.id(),
            instructor_id: session.instructor_id().clone(),
            learner_id: session.learner_id().clone(),
            rating,
            has_review: session.review().is_some(),
            rated_at: *session.updated_at(),
        }
    }
}

domain_event!(
    SessionRated,
    event_type = "session.rated.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = rated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// MeetingRoomAssigned
// ════════════════════════════════════════════════════════════════════════════

/// Published once per session, when the first join creates its room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRoomAssigned {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub meeting_room: MeetingRoomId,
    pub assigned_at: Timestamp,
}

domain_event!(
    MeetingRoomAssigned,
    event_type = "session.room_assigned.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = assigned_at,
    event_id = event_id
);
