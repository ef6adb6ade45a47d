//! ConfirmSessionHandler - Instructor accepts a pending booking.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::session::{Session, SessionConfirmed, SessionError};
use crate::ports::{Clock, EventPublisher, SessionRepository};

use super::{load_session, publish_committed};

#[derive(Debug, Clone)]
pub struct ConfirmSessionCommand {
    pub session_id: SessionId,
}

pub struct ConfirmSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl ConfirmSessionHandler {
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
        cmd: ConfirmSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, SessionError> {
        let mut session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        let expected = session.status();

        session.confirm(&metadata.user_id, self.clock.now())?;
        self.sessions
            .commit_transition(&session, expected, &[])
            .await?;

        tracing::info!(session_id = %session.id(), "Session confirmed");

        let event = SessionConfirmed::new(&session);
        publish_committed(self.publisher.as_ref(), &event, &metadata).await;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::test_support::*;
    use crate::domain::foundation::SessionStatus;
    use crate::domain::session::SessionTransition;

    fn handler(fx: &Fixture) -> ConfirmSessionHandler {
        ConfirmSessionHandler::new(fx.store.clone(), fx.bus.clone(), fx.clock.clone())
    }

    #[tokio::test]
    async fn instructor_confirms_pending_session() {
        let fx = Fixture::new(10);
        let session = fx.booked(2, 60).await;

        let confirmed = handler(&fx)
            .handle(
                ConfirmSessionCommand {
                    session_id: *session.id(),
                },
                metadata(INSTRUCTOR),
            )
            .await
            .unwrap();

        assert_eq!(confirmed.status(), SessionStatus::Confirmed);
        assert!(fx.bus.has_event("session.confirmed.v1"));
        // Confirmation moves no credits.
        assert_eq!(fx.balance(LEARNER).await, 8);
        assert_eq!(fx.balance(INSTRUCTOR).await, 0);
    }

    #[tokio::test]
    async fn learner_cannot_confirm() {
        let fx = Fixture::new(10);
        let session = fx.booked(2, 60).await;

        let result = handler(&fx)
            .handle(
                ConfirmSessionCommand {
                    session_id: *session.id(),
                },
                metadata(LEARNER),
            )
            .await;

        assert_eq!(result.unwrap_err(), SessionError::NotAuthorized);
    }

    #[tokio::test]
    async fn confirming_twice_is_invalid_status() {
        let fx = Fixture::new(10);
        let session = fx.confirmed(2, 60).await;

        let result = handler(&fx)
            .handle(
                ConfirmSessionCommand {
                    session_id: *session.id(),
                },
                metadata(INSTRUCTOR),
            )
            .await;

        assert_eq!(
            result.unwrap_err(),
            SessionError::invalid_status(SessionStatus::Confirmed, SessionTransition::Confirm)
        );
    }

    #[tokio::test]
    async fn stranger_on_wrong_status_gets_not_authorized() {
        let fx = Fixture::new(10);
        let session = fx.confirmed(2, 60).await;

        let result = handler(&fx)
            .handle(
                ConfirmSessionCommand {
                    session_id: *session.id(),
                },
                metadata(STRANGER),
            )
            .await;

        assert_eq!(result.unwrap_err(), SessionError::NotAuthorized);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let fx = Fixture::new(10);
        let id = SessionId::new();

        let result = handler(&fx)
            .handle(ConfirmSessionCommand { session_id: id }, metadata(INSTRUCTOR))
            .await;

        assert_eq!(result.unwrap_err(), SessionError::NotFound(id));
    }
}
