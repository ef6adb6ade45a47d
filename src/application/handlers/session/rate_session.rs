//! RateSessionHandler - Learner rates a completed session.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::session::{Session, SessionError, SessionRated};
use crate::ports::{Clock, EventPublisher, SessionRepository};

use super::{load_session, publish_committed};

#[derive(Debug, Clone)]
pub struct RateSessionCommand {
    pub session_id: SessionId,
    /// 1 to 5 inclusive.
    pub rating: i64,
    pub review: Option<String>,
}

pub struct RateSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl RateSessionHandler {
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
        cmd: RateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, SessionError> {
        let mut session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        let rating = session.rate(&metadata.user_id, cmd.rating, cmd.review, self.clock.now())?;

        // Conditional on "completed and unrated", so a concurrent rating loses.
        self.sessions.record_rating(&session).await?;

        tracing::info!(session_id = %session.id(), rating = rating.value(), "Session rated");

        let event = SessionRated::new(&session, rating);
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

    fn handler(fx: &Fixture) -> RateSessionHandler {
        RateSessionHandler::new(fx.store.clone(), fx.bus.clone(), fx.clock.clone())
    }

    fn command(session: &Session, rating: i64) -> RateSessionCommand {
        RateSessionCommand {
            session_id: *session.id(),
            rating,
            review: Some("  Clear and patient.  ".to_string()),
        }
    }

    async fn completed(fx: &Fixture) -> Session {
        let mut session = fx.confirmed(1, 60).await;
        let settlement = session.complete(&uid(INSTRUCTOR), morning()).unwrap();
        fx.store
            .commit_transition(&session, SessionStatus::Confirmed, &[settlement])
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn learner_rates_completed_session() {
        let fx = Fixture::new(10);
        let session = completed(&fx).await;

        let rated = handler(&fx)
            .handle(command(&session, 5), metadata(LEARNER))
            .await
            .unwrap();

        assert_eq!(rated.rating().map(|r| r.value()), Some(5));
        assert_eq!(rated.review(), Some("Clear and patient."));
        assert_eq!(rated.status(), SessionStatus::Completed);

        let stored = fx.store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.rating().map(|r| r.value()), Some(5));
        assert!(fx.bus.has_event("session.rated.v1"));
    }

    #[tokio::test]
    async fn second_rating_is_rejected() {
        let fx = Fixture::new(10);
        let session = completed(&fx).await;
        handler(&fx)
            .handle(command(&session, 4), metadata(LEARNER))
            .await
            .unwrap();

        let result = handler(&fx)
            .handle(command(&session, 2), metadata(LEARNER))
            .await;

        assert_eq!(result.unwrap_err(), SessionError::AlreadyRated);
    }

    #[tokio::test]
    async fn instructor_cannot_rate() {
        let fx = Fixture::new(10);
        let session = completed(&fx).await;

        let result = handler(&fx)
            .handle(command(&session, 5), metadata(INSTRUCTOR))
            .await;

        assert_eq!(result.unwrap_err(), SessionError::NotAuthorized);
    }

    #[tokio::test]
    async fn confirmed_session_cannot_be_rated() {
        let fx = Fixture::new(10);
        let session = fx.confirmed(1, 60).await;

        let result = handler(&fx)
            .handle(command(&session, 5), metadata(LEARNER))
            .await;

        assert_eq!(
            result.unwrap_err(),
            SessionError::invalid_status(SessionStatus::Confirmed, SessionTransition::Rate)
        );
    }

    #[tokio::test]
    async fn out_of_range_rating_is_validation_error() {
        let fx = Fixture::new(10);
        let session = completed(&fx).await;

        let result = handler(&fx)
            .handle(command(&session, 6), metadata(LEARNER))
            .await;

        assert!(matches!(
            result,
            Err(SessionError::ValidationFailed { ref field, .. }) if field == "rating"
        ));
    }

    #[tokio::test]
    async fn missing_session_wins_over_bad_rating() {
        let fx = Fixture::new(10);

        let result = handler(&fx)
            .handle(
                RateSessionCommand {
                    session_id: SessionId::new(),
                    rating: 0,
                    review: None,
                },
                metadata(STRANGER),
            )
            .await;

        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn outsider_with_bad_rating_is_not_authorized() {
        let fx = Fixture::new(10);
        let session = completed(&fx).await;

        let result = handler(&fx)
            .handle(command(&session, 9), metadata(STRANGER))
            .await;

        assert_eq!(result.unwrap_err(), SessionError::NotAuthorized);
    }
}
