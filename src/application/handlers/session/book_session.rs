//! BookSessionHandler - Command handler for booking a session.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, Timestamp, UserId};
use crate::domain::session::{
    validate_booking, BookingRequest, Session, SessionBooked, SessionError,
};
use crate::ports::{Clock, EventPublisher, SessionRepository, UserDirectory};

use super::publish_committed;

/// Command to book a session. The caller is the learner.
#[derive(Debug, Clone)]
pub struct BookSessionCommand {
    pub instructor_id: UserId,
    pub skill: String,
    pub start_time: Timestamp,
    pub duration_minutes: i64,
}

/// Result of a successful booking.
#[derive(Debug, Clone)]
pub struct BookSessionResult {
    pub session: Session,
    pub event: SessionBooked,
}

/// Handler for booking sessions.
pub struct BookSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserDirectory>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl BookSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserDirectory>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            users,
            publisher,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: BookSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<BookSessionResult, SessionError> {
        let now = self.clock.now();
        let request = BookingRequest {
            instructor_id: cmd.instructor_id,
            learner_id: metadata.user_id.clone(),
            skill: cmd.skill,
            start_time: cmd.start_time,
            duration_minutes: cmd.duration_minutes,
        };

        // 1. Load both participants and validate
        let instructor = self.users.find_user(&request.instructor_id).await?;
        let learner = self.users.find_user(&request.learner_id).await?;
        let draft = validate_booking(&request, instructor.as_ref(), learner.as_ref(), now)?;
        let (instructor_contact, learner_contact) = (draft.instructor.clone(), draft.learner.clone());

        // 2. Create the pending session and its reservation
        let (session, reservation) = Session::book(draft, now);

        // 3. Insert and debit atomically; the ledger re-checks the balance
        self.sessions
            .insert_with_reservation(&session, &reservation)
            .await?;

        tracing::info!(
            session_id = %session.id(),
            instructor_id = %session.instructor_id(),
            learner_id = %session.learner_id(),
            credits = session.credits(),
            "Session booked"
        );

        // 4. Publish
        let event = SessionBooked::new(&session, instructor_contact, learner_contact);
        publish_committed(self.publisher.as_ref(), &event, &metadata).await;

        Ok(BookSessionResult { session, event })
    }
}
