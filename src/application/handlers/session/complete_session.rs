//! CompleteSessionHandler - Instructor marks a session held and is paid.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::session::{Session, SessionCompleted, SessionError};
use crate::ports::{Clock, EventPublisher, SessionRepository};

use super::{load_session, publish_committed};

#[derive(Debug, Clone)]
pub struct CompleteSessionCommand {
    pub session_id: SessionId,
}

pub struct CompleteSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl CompleteSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            publisher,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, SessionError> {
        let mut session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        let expected = session.status();

        let settlement = session.complete(&metadata.user_id, self.clock.now())?;
        self.sessions
            .commit_transition(&session, expected, std::slice::from_ref(&settlement))
            .await?;

        tracing::info!(
            session_id = %session.id(),
            instructor_id = %session.instructor_id(),
            credits = settlement.amount,
            "Session completed, credits settled"
        );

        let event = SessionCompleted::new(&session);
        publish_committed(self.publisher.as_ref(), &event, &metadata).await;

        Ok(session)
    }
}
