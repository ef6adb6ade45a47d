//! Session aggregate entity.
//!
//! A session is a booked, time-boxed lesson between one instructor and one
//! learner. Its status only moves along the `SessionStatus` state machine,
//! and each move hands back the credit movements that must be committed
//! together with it.
//!
//! # Authorization
//!
//! Every mutation checks the actor before the status, so an outsider learns
//! nothing about a session's state from the error they get back.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BookingDraft, CancellationPolicy, SessionError, SessionTransition};
use crate::domain::foundation::{
    MeetingRoomId, Rating, SessionId, SessionStatus, StateMachine, Timestamp, UserId,
};
use crate::domain::ledger::{CreditMovement, MovementKind};

/// Maximum length for a review, in characters.
pub const MAX_REVIEW_LENGTH: usize = 2000;

/// Which side of a session a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Instructor,
    Learner,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Instructor => "instructor",
            ParticipantRole::Learner => "learner",
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger consequences of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationOutcome {
    pub cancelled_by: ParticipantRole,
    pub previous_status: SessionStatus,
    /// Present when the reservation goes back to the learner.
    pub refund: Option<CreditMovement>,
    /// Present when a same-day cancellation destroys the reservation.
    pub forfeiture: Option<CreditMovement>,
}

impl CancellationOutcome {
    /// Journal entries to commit with the status change.
    pub fn movements(&self) -> Vec<CreditMovement> {
        self.refund
            .iter()
            .chain(self.forfeiture.iter())
            .cloned()
            .collect()
    }

    pub fn refunded(&self) -> u32 {
        self.refund.as_ref().map_or(0, |m| m.amount)
    }

    pub fn forfeited(&self) -> u32 {
        self.forfeiture.as_ref().map_or(0, |m| m.amount)
    }
}

/// Session aggregate.
///
/// # Invariants
///
/// - `instructor_id != learner_id`
/// - `credits` is fixed at booking and never recomputed
/// - `rating` is only set on a completed session, and only once
/// - `meeting_room` is only set on a confirmed session, and never replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    instructor_id: UserId,
    learner_id: UserId,
    skill: String,
    start_time: Timestamp,
    duration_minutes: u32,
    credits: u32,
    status: SessionStatus,
    meeting_room: Option<MeetingRoomId>,
    rating: Option<Rating>,
    review: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates a pending session from a validated draft.
    ///
    /// Returns the session together with the learner's reservation, which
    /// must be committed in the same store operation as the insert.
    pub fn book(draft: BookingDraft, now: Timestamp) -> (Self, CreditMovement) {
        let id = SessionId::new();
        let reservation = CreditMovement::new(
            draft.learner.id.clone(),
            Some(id),
            MovementKind::Reservation,
            draft.credits,
            now,
        );
        let session = Self {
            id,
            instructor_id: draft.instructor.id,
            learner_id: draft.learner.id,
            skill: draft.skill,
            start_time: draft.start_time,
            duration_minutes: draft.duration_minutes,
            credits: draft.credits,
            status: SessionStatus::Pending,
            meeting_room: None,
            rating: None,
            review: None,
            created_at: now,
            updated_at: now,
        };
        (session, reservation)
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        instructor_id: UserId,
        learner_id: UserId,
        skill: String,
        start_time: Timestamp,
        duration_minutes: u32,
        credits: u32,
        status: SessionStatus,
        meeting_room: Option<MeetingRoomId>,
        rating: Option<Rating>,
        review: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            instructor_id,
            learner_id,
            skill,
            start_time,
            duration_minutes,
            credits,
            status,
            meeting_room,
            rating,
            review,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn instructor_id(&self) -> &UserId {
        &self.instructor_id
    }

    pub fn learner_id(&self) -> &UserId {
        &self.learner_id
    }

    /// Canonical skill name as listed by the instructor.
    pub fn skill(&self) -> &str {
        &self.skill
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Credits reserved at booking.
    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn meeting_room(&self) -> Option<&MeetingRoomId> {
        self.meeting_room.as_ref()
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn review(&self) -> Option<&str> {
        self.review.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the side of the session the user is on, if any.
    pub fn role_of(&self, user_id: &UserId) -> Option<ParticipantRole> {
        if &self.instructor_id == user_id {
            Some(ParticipantRole::Instructor)
        } else if &self.learner_id == user_id {
            Some(ParticipantRole::Learner)
        } else {
            None
        }
    }

    /// The other participant, as seen from `role`.
    pub fn counterpart_of(&self, role: ParticipantRole) -> &UserId {
        match role {
            ParticipantRole::Instructor => &self.learner_id,
            ParticipantRole::Learner => &self.instructor_id,
        }
    }

    /// Validates that the user takes part in this session.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if the user is neither instructor nor learner
    pub fn authorize_participant(&self, user_id: &UserId) -> Result<ParticipantRole, SessionError> {
        self.role_of(user_id).ok_or(SessionError::NotAuthorized)
    }

    fn authorize_as(&self, user_id: &UserId, role: ParticipantRole) -> Result<(), SessionError> {
        match self.role_of(user_id) {
            Some(actual) if actual == role => Ok(()),
            _ => Err(SessionError::NotAuthorized),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Instructor accepts a pending booking.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if the actor is not the instructor
    /// - `InvalidStatus` unless the session is pending
    pub fn confirm(&mut self, actor: &UserId, now: Timestamp) -> Result<(), SessionError> {
        self.authorize_as(actor, ParticipantRole::Instructor)?;
        self.advance(SessionStatus::Confirmed, SessionTransition::Confirm, now)
    }

    /// Instructor marks a confirmed session as held.
    ///
    /// Returns the settlement paying the reserved credits to the instructor.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if the actor is not the instructor
    /// - `InvalidStatus` unless the session is confirmed
    pub fn complete(&mut self, actor: &UserId, now: Timestamp) -> Result<CreditMovement, SessionError> {
        self.authorize_as(actor, ParticipantRole::Instructor)?;
        self.advance(SessionStatus::Completed, SessionTransition::Complete, now)?;
        Ok(CreditMovement::new(
            self.instructor_id.clone(),
            Some(self.id),
            MovementKind::Settlement,
            self.credits,
            now,
        ))
    }

    /// Either participant cancels a pending or confirmed session.
    ///
    /// The reservation is refunded unless `now` is on the same local day as
    /// the start time, in which case it is forfeited.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if the actor is not a participant
    /// - `InvalidStatus` if the session is already completed or cancelled
    pub fn cancel(
        &mut self,
        actor: &UserId,
        now: Timestamp,
        policy: &CancellationPolicy,
    ) -> Result<CancellationOutcome, SessionError> {
        let cancelled_by = self.authorize_participant(actor)?;
        let previous_status = self.status;
        self.advance(SessionStatus::Cancelled, SessionTransition::Cancel, now)?;

        let kind = if policy.refunds(&self.start_time, &now) {
            MovementKind::Refund
        } else {
            MovementKind::Forfeiture
        };
        let movement = CreditMovement::new(
            self.learner_id.clone(),
            Some(self.id),
            kind,
            self.credits,
            now,
        );

        let (refund, forfeiture) = match kind {
            MovementKind::Refund => (Some(movement), None),
            _ => (None, Some(movement)),
        };
        Ok(CancellationOutcome {
            cancelled_by,
            previous_status,
            refund,
            forfeiture,
        })
    }

    /// Learner rates a completed session. Status does not change.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if the actor is not the learner
    /// - `InvalidStatus` unless the session is completed
    /// - `AlreadyRated` if a rating is already attached
    /// - `ValidationFailed` if the rating is outside 1..=5 or the review is
    ///   too long
    pub fn rate(
        &mut self,
        actor: &UserId,
        rating: i64,
        review: Option<String>,
        now: Timestamp,
    ) -> Result<Rating, SessionError> {
        self.authorize_as(actor, ParticipantRole::Learner)?;
        if self.status != SessionStatus::Completed {
            return Err(SessionError::invalid_status(self.status, SessionTransition::Rate));
        }
        if self.rating.is_some() {
            return Err(SessionError::AlreadyRated);
        }

        let rating = Rating::new(rating)
            .map_err(|e| SessionError::validation(e.field(), e.to_string()))?;
        let review = review
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(text) = &review {
            if text.chars().count() > MAX_REVIEW_LENGTH {
                return Err(SessionError::validation(
                    "review",
                    format!("Review must be {} characters or less", MAX_REVIEW_LENGTH),
                ));
            }
        }

        self.rating = Some(rating);
        self.review = review;
        self.updated_at = now;
        Ok(rating)
    }

    /// Checks that the actor may enter the meeting room.
    ///
    /// # Errors
    ///
    /// - `NotAuthorized` if the actor is not a participant
    /// - `InvalidStatus` unless the session is confirmed
    pub fn authorize_join(&self, actor: &UserId) -> Result<ParticipantRole, SessionError> {
        let role = self.authorize_participant(actor)?;
        if self.status != SessionStatus::Confirmed {
            return Err(SessionError::invalid_status(self.status, SessionTransition::Join));
        }
        Ok(role)
    }

    /// Attaches the room the store settled on. An existing room is kept.
    pub fn attach_room(&mut self, room: MeetingRoomId) {
        if self.meeting_room.is_none() {
            self.meeting_room = Some(room);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn advance(
        &mut self,
        target: SessionStatus,
        transition: SessionTransition,
        now: Timestamp,
    ) -> Result<(), SessionError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|illegal| SessionError::invalid_status(illegal.from, transition))?;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserContact;
    use chrono::{TimeZone, Utc};

    fn instructor() -> UserId {
        UserId::new("inst-1").unwrap()
    }

    fn learner() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    fn stranger() -> UserId {
        UserId::new("stranger").unwrap()
    }

    fn at(d: u32, h: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap())
    }

    fn contact(id: UserId) -> UserContact {
        UserContact {
            name: id.to_string(),
            email: format!("{}@example.com", id),
            id,
        }
    }

    fn draft() -> BookingDraft {
        BookingDraft {
            instructor: contact(instructor()),
            learner: contact(learner()),
            skill: "Rust".to_string(),
            start_time: at(15, 10),
            duration_minutes: 60,
            credits: 2,
        }
    }

    fn pending() -> Session {
        Session::book(draft(), at(1, 9)).0
    }

    fn confirmed() -> Session {
        let mut session = pending();
        session.confirm(&instructor(), at(2, 9)).unwrap();
        session
    }

    fn completed() -> Session {
        let mut session = confirmed();
        session.complete(&instructor(), at(15, 11)).unwrap();
        session
    }

    // Booking tests

    #[test]
    fn book_creates_pending_session_with_reservation() {
        let (session, reservation) = Session::book(draft(), at(1, 9));

        assert_eq!(session.status(), SessionStatus::Pending);
        assert_eq!(session.credits(), 2);
        assert_eq!(reservation.kind, MovementKind::Reservation);
        assert_eq!(reservation.user_id, learner());
        assert_eq!(reservation.amount, 2);
        assert_eq!(reservation.session_id, Some(*session.id()));
    }

    // Confirm tests

    #[test]
    fn instructor_confirms_pending_session() {
        let session = confirmed();
        assert_eq!(session.status(), SessionStatus::Confirmed);
        assert_eq!(session.updated_at(), &at(2, 9));
    }

    #[test]
    fn learner_cannot_confirm() {
        let mut session = pending();
        assert_eq!(
            session.confirm(&learner(), at(2, 9)),
            Err(SessionError::NotAuthorized)
        );
        assert_eq!(session.status(), SessionStatus::Pending);
    }

    #[test]
    fn confirm_twice_is_invalid_status() {
        let mut session = confirmed();
        assert_eq!(
            session.confirm(&instructor(), at(3, 9)),
            Err(SessionError::invalid_status(
                SessionStatus::Confirmed,
                SessionTransition::Confirm
            ))
        );
    }

    #[test]
    fn authorization_is_checked_before_status() {
        let mut session = completed();
        assert_eq!(
            session.confirm(&stranger(), at(16, 9)),
            Err(SessionError::NotAuthorized)
        );
    }

    // Complete tests

    #[test]
    fn complete_settles_credits_to_instructor() {
        let mut session = confirmed();
        let settlement = session.complete(&instructor(), at(15, 11)).unwrap();

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(settlement.kind, MovementKind::Settlement);
        assert_eq!(settlement.user_id, instructor());
        assert_eq!(settlement.amount, 2);
    }

    #[test]
    fn pending_session_cannot_be_completed() {
        let mut session = pending();
        assert_eq!(
            session.complete(&instructor(), at(15, 11)).unwrap_err(),
            SessionError::invalid_status(SessionStatus::Pending, SessionTransition::Complete)
        );
    }

    // Cancel tests

    #[test]
    fn early_cancellation_refunds_learner() {
        let mut session = confirmed();
        let outcome = session
            .cancel(&learner(), at(10, 9), &CancellationPolicy::utc())
            .unwrap();

        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert_eq!(outcome.cancelled_by, ParticipantRole::Learner);
        assert_eq!(outcome.previous_status, SessionStatus::Confirmed);
        assert_eq!(outcome.refunded(), 2);
        assert_eq!(outcome.forfeited(), 0);
        assert_eq!(outcome.movements().len(), 1);
    }

    #[test]
    fn same_day_cancellation_forfeits_even_when_instructor_cancels() {
        let mut session = pending();
        let outcome = session
            .cancel(&instructor(), at(15, 1), &CancellationPolicy::utc())
            .unwrap();

        assert_eq!(outcome.cancelled_by, ParticipantRole::Instructor);
        assert_eq!(outcome.refunded(), 0);
        assert_eq!(outcome.forfeited(), 2);
        assert_eq!(outcome.movements()[0].kind, MovementKind::Forfeiture);
    }

    #[test]
    fn completed_session_cannot_be_cancelled() {
        let mut session = completed();
        assert_eq!(
            session
                .cancel(&learner(), at(16, 9), &CancellationPolicy::utc())
                .unwrap_err(),
            SessionError::invalid_status(SessionStatus::Completed, SessionTransition::Cancel)
        );
    }

    #[test]
    fn stranger_cannot_cancel() {
        let mut session = pending();
        assert_eq!(
            session
                .cancel(&stranger(), at(2, 9), &CancellationPolicy::utc())
                .unwrap_err(),
            SessionError::NotAuthorized
        );
    }

    // Rating tests

    #[test]
    fn learner_rates_completed_session_once() {
        let mut session = completed();
        let rating = session
            .rate(&learner(), 5, Some("  Great  ".to_string()), at(16, 9))
            .unwrap();
        assert_eq!(rating.value(), 5);
        assert_eq!(session.rating(), Some(rating));
        assert_eq!(session.review(), Some("Great"));
        assert_eq!(session.status(), SessionStatus::Completed);

        assert_eq!(
            session.rate(&learner(), 4, None, at(16, 10)),
            Err(SessionError::AlreadyRated)
        );
    }

    #[test]
    fn instructor_cannot_rate() {
        let mut session = completed();
        assert_eq!(
            session.rate(&instructor(), 4, None, at(16, 9)),
            Err(SessionError::NotAuthorized)
        );
    }

    #[test]
    fn confirmed_session_cannot_be_rated() {
        let mut session = confirmed();
        assert_eq!(
            session.rate(&learner(), 4, None, at(16, 9)),
            Err(SessionError::invalid_status(
                SessionStatus::Confirmed,
                SessionTransition::Rate
            ))
        );
    }

    #[test]
    fn overlong_review_is_rejected() {
        let mut session = completed();
        let review = "x".repeat(MAX_REVIEW_LENGTH + 1);
        let result = session.rate(&learner(), 3, Some(review), at(16, 9));
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
        assert!(session.rating().is_none());
    }

    #[test]
    fn out_of_range_rating_is_checked_after_authorization() {
        let mut session = completed();
        assert_eq!(
            session.rate(&instructor(), 9, None, at(16, 9)),
            Err(SessionError::NotAuthorized)
        );

        let result = session.rate(&learner(), 0, None, at(16, 9));
        assert!(matches!(
            result,
            Err(SessionError::ValidationFailed { ref field, .. }) if field == "rating"
        ));
        assert!(session.rating().is_none());
    }

    // Join tests

    #[test]
    fn participants_join_confirmed_session() {
        let session = confirmed();
        assert_eq!(session.authorize_join(&instructor()), Ok(ParticipantRole::Instructor));
        assert_eq!(session.authorize_join(&learner()), Ok(ParticipantRole::Learner));
        assert_eq!(session.authorize_join(&stranger()), Err(SessionError::NotAuthorized));
    }

    #[test]
    fn pending_session_cannot_be_joined() {
        assert_eq!(
            pending().authorize_join(&learner()),
            Err(SessionError::invalid_status(
                SessionStatus::Pending,
                SessionTransition::Join
            ))
        );
    }

    #[test]
    fn attach_room_keeps_first_room() {
        let mut session = confirmed();
        let first = MeetingRoomId::generate();
        session.attach_room(first.clone());
        session.attach_room(MeetingRoomId::generate());
        assert_eq!(session.meeting_room(), Some(&first));
    }

    #[test]
    fn counterpart_is_the_other_side() {
        let session = pending();
        assert_eq!(session.counterpart_of(ParticipantRole::Learner), &instructor());
        assert_eq!(session.counterpart_of(ParticipantRole::Instructor), &learner());
    }
}
