//! JoinSessionHandler - Participant enters the meeting room.
//!
//! The first join of a confirmed session creates the room id. Concurrent
//! first joins race on a store-side "set if unset", so all of them leave
//! with the same room.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, EventId, MeetingRoomId, SessionId};
use crate::domain::session::{MeetingRoomAssigned, ParticipantRole, SessionError};
use crate::ports::{Clock, EventPublisher, SessionRepository};

use super::{load_session, publish_committed};

#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSessionResult {
    pub session_id: SessionId,
    pub meeting_room: MeetingRoomId,
    /// Caller's side of the session.
    pub role: ParticipantRole,
}

pub struct JoinSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl JoinSessionHandler {
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
        cmd: JoinSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<JoinSessionResult, SessionError> {
        let mut session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        let role = session.authorize_join(&metadata.user_id)?;

        if let Some(room) = session.meeting_room() {
            return Ok(JoinSessionResult {
                session_id: cmd.session_id,
                meeting_room: room.clone(),
                role,
            });
        }

        let candidate = MeetingRoomId::generate();
        let assigned = self
            .sessions
            .assign_room_if_absent(&cmd.session_id, &candidate)
            .await?;
        session.attach_room(assigned.clone());

        if assigned == candidate {
            tracing::info!(
                session_id = %cmd.session_id,
                meeting_room = %assigned,
                "Meeting room assigned"
            );
            let event = MeetingRoomAssigned {
                event_id: EventId::new(),
                session_id: cmd.session_id,
                meeting_room: assigned.clone(),
                assigned_at: self.clock.now(),
            };
            publish_committed(self.publisher.as_ref(), &event, &metadata).await;
        }

        Ok(JoinSessionResult {
            session_id: cmd.session_id,
            meeting_room: assigned,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::test_support::*;
    use crate::domain::foundation::SessionStatus;
    use crate::domain::session::SessionTransition;

    fn handler(fx: &Fixture) -> JoinSessionHandler {
        JoinSessionHandler::new(fx.store.clone(), fx.bus.clone(), fx.clock.clone())
    }

    #[tokio::test]
    async fn both_participants_get_the_same_room() {
        let fx = Fixture::new(10);
        let session = fx.confirmed(1, 60).await;
        let cmd = JoinSessionCommand {
            session_id: *session.id(),
        };

        let learner = handler(&fx)
            .handle(cmd.clone(), metadata(LEARNER))
            .await
            .unwrap();
        let instructor = handler(&fx).handle(cmd, metadata(INSTRUCTOR)).await.unwrap();

        assert_eq!(learner.meeting_room, instructor.meeting_room);
        assert_eq!(learner.role, ParticipantRole::Learner);
        assert_eq!(instructor.role, ParticipantRole::Instructor);
        assert_eq!(fx.bus.events_of_type("session.room_assigned.v1").len(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_joins_agree_on_one_room() {
        let fx = Fixture::new(10);
        let session = fx.confirmed(1, 60).await;
        let cmd = JoinSessionCommand {
            session_id: *session.id(),
        };
        let first = handler(&fx);
        let second = handler(&fx);

        let (a, b) = tokio::join!(
            first.handle(cmd.clone(), metadata(LEARNER)),
            second.handle(cmd.clone(), metadata(INSTRUCTOR))
        );

        assert_eq!(a.unwrap().meeting_room, b.unwrap().meeting_room);
    }

    #[tokio::test]
    async fn pending_session_cannot_be_joined() {
        let fx = Fixture::new(10);
        let session = fx.booked(1, 60).await;

        let result = handler(&fx)
            .handle(
                JoinSessionCommand {
                    session_id: *session.id(),
                },
                metadata(LEARNER),
            )
            .await;

        assert_eq!(
            result.unwrap_err(),
            SessionError::invalid_status(SessionStatus::Pending, SessionTransition::Join)
        );
    }

    #[tokio::test]
    async fn stranger_cannot_join() {
        let fx = Fixture::new(10);
        let session = fx.confirmed(1, 60).await;

        let result = handler(&fx)
            .handle(
                JoinSessionCommand {
                    session_id: *session.id(),
                },
                metadata(STRANGER),
            )
            .await;

        assert_eq!(result.unwrap_err(), SessionError::NotAuthorized);
    }
}
