//! Session lifecycle handlers.
//!
//! Command handlers follow one sequence: load, authorize, transition the
//! aggregate, commit the status change together with its credit movements,
//! then publish. Publishing happens after the commit and never fails the
//! command.

mod book_session;
mod cancel_session;
mod complete_session;
mod confirm_session;
mod get_session;
mod join_session;
mod list_upcoming;
mod rate_session;

#[cfg(test)]
pub(crate) mod test_support;

pub use book_session::{BookSessionCommand, BookSessionHandler, BookSessionResult};
pub use cancel_session::{CancelSessionCommand, CancelSessionHandler, CancelSessionResult};
pub use complete_session::{CompleteSessionCommand, CompleteSessionHandler};
pub use confirm_session::{ConfirmSessionCommand, ConfirmSessionHandler};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use join_session::{JoinSessionCommand, JoinSessionHandler, JoinSessionResult};
pub use list_upcoming::{ListUpcomingSessionsHandler, ListUpcomingSessionsQuery, UpcomingSession};
pub use rate_session::{RateSessionCommand, RateSessionHandler};

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{EventPublisher, SessionRepository};

/// Loads a session or reports it missing.
pub(crate) async fn load_session(
    repository: &dyn SessionRepository,
    id: &SessionId,
) -> Result<Session, SessionError> {
    repository
        .find_by_id(id)
        .await?
        .ok_or(SessionError::NotFound(*id))
}

/// Publishes a committed event, stamped with the command's context.
///
/// Failures are logged; the state change they describe has already happened.
pub(crate) async fn publish_committed<E>(
    publisher: &dyn EventPublisher,
    event: &E,
    metadata: &CommandMetadata,
) where
    E: SerializableDomainEvent,
{
    let envelope = match event.to_envelope() {
        Ok(envelope) => envelope
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string())
            .with_source(metadata.source()),
        Err(e) => {
            tracing::warn!(
                event_type = event.event_type(),
                error = %e,
                "Failed to serialize domain event"
            );
            return;
        }
    };

    if let Err(e) = publisher.publish(envelope).await {
        tracing::warn!(
            event_type = event.event_type(),
            aggregate_id = %event.aggregate_id(),
            error = %e,
            "Failed to publish domain event"
        );
    }
}
