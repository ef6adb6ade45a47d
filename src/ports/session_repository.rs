//! Session repository port.
//!
//! Defines the contract for persisting Session aggregates together with the
//! credit movements their transitions produce.
//!
//! # Design
//!
//! - **Atomic**: a status change and its ledger effect commit together or
//!   not at all
//! - **Optimistic**: transitions are compare-and-set on the status the
//!   handler loaded; a lost race is reported, never overwritten
//! - **Participant-scoped**: listing queries are by instructor or learner

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MeetingRoomId, SessionId, SessionStatus, Timestamp, UserId};
use crate::domain::ledger::CreditMovement;
use crate::domain::session::Session;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts a new pending session and debits the learner's reservation.
    ///
    /// The debit is conditional on the balance covering it at commit time,
    /// so concurrent bookings can never overdraw a learner.
    ///
    /// # Errors
    ///
    /// - `InsufficientCredits` (with `required`/`available`) if the balance is short
    /// - `UserNotFound` if the learner row does not exist
    /// - `DatabaseError` on persistence failure
    async fn insert_with_reservation(
        &self,
        session: &Session,
        reservation: &CreditMovement,
    ) -> Result<(), DomainError>;

    /// Writes a status transition and applies its credit movements.
    ///
    /// Succeeds only if the stored status still equals `expected`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored status moved on
    /// - `DatabaseError` on persistence failure
    async fn commit_transition(
        &self,
        session: &Session,
        expected: SessionStatus,
        movements: &[CreditMovement],
    ) -> Result<(), DomainError>;

    /// Stores the rating and review of a completed session.
    ///
    /// # Errors
    ///
    /// - `AlreadyRated` if a rating was stored concurrently
    /// - `DatabaseError` on persistence failure
    async fn record_rating(&self, session: &Session) -> Result<(), DomainError>;

    /// Sets the meeting room unless one is already set, and returns the
    /// room the session ends up with.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the session is no longer confirmed
    /// - `DatabaseError` on persistence failure
    async fn assign_room_if_absent(
        &self,
        id: &SessionId,
        room: &MeetingRoomId,
    ) -> Result<MeetingRoomId, DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Pending or confirmed sessions of a participant starting after `now`,
    /// ordered by start time ascending.
    async fn find_upcoming_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Vec<Session>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
