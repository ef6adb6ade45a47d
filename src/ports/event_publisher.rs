//! EventPublisher port - Interface for publishing domain events.
//!
//! Handlers publish after their store operation has committed. The
//! transport (in-process bus today) stays behind this trait.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// An `Ok` means the event was accepted for delivery, not that handlers ran.
/// Queued implementations report handler failures in logs only; an `Err`
/// means the event was not accepted.
///
/// # Example
///
/// ```ignore
/// let envelope = SessionConfirmed::new(&session).to_envelope()?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order, best-effort.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
