//! CancelSessionHandler - Either participant cancels a session.
//!
//! The reservation goes back to the learner, unless the cancellation happens
//! on the session's own calendar day, in which case it is forfeited.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::session::{
    CancellationOutcome, CancellationPolicy, Session, SessionCancelled, SessionError,
};
use crate::ports::{Clock, EventPublisher, SessionRepository};

use super::{load_session, publish_committed};

#[derive(Debug, Clone)]
pub struct CancelSessionCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct CancelSessionResult {
    pub session: Session,
    pub outcome: CancellationOutcome,
}

pub struct CancelSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    policy: CancellationPolicy,
}

impl CancelSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            sessions,
            publisher,
            clock,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CancelSessionResult, SessionError> {
        let mut session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        let expected = session.status();

        let outcome = session.cancel(&metadata.user_id, self.clock.now(), &self.policy)?;
        self.sessions
            .commit_transition(&session, expected, &outcome.movements())
            .await?;

        tracing::info!(
            session_id = %session.id(),
            cancelled_by = outcome.cancelled_by.as_str(),
            refunded = outcome.refunded(),
            forfeited = outcome.forfeited(),
            "Session cancelled"
        );

        let event = SessionCancelled::new(&session, &metadata.user_id, &outcome);
        publish_committed(self.publisher.as_ref(), &event, &metadata).await;

        Ok(CancelSessionResult { session, outcome })
    }
}
