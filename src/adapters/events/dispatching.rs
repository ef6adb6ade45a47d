//! Queue-backed event bus for the running server.
//!
//! `publish` only enqueues; a single worker task drains the queue and calls
//! the subscribed handlers, so a slow notifier never holds up the command
//! that raised the event. Nothing is retained after delivery.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// Envelopes that may wait for delivery before `publish` starts refusing.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

type Subscriptions = Arc<RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>>;

/// Fire-and-forget bus backed by a bounded `mpsc` channel.
///
/// The worker stops once every clone of the bus has been dropped and the
/// queue is empty; await the returned handle to drain on shutdown.
pub struct DispatchingEventBus {
    subscriptions: Subscriptions,
    queue: mpsc::Sender<EventEnvelope>,
}

impl DispatchingEventBus {
    /// Creates the bus and spawns its delivery worker on the current runtime.
    pub fn spawn(capacity: usize) -> (Arc<Self>, JoinHandle<()>) {
        let (queue, pending) = mpsc::channel(capacity.max(1));
        let subscriptions: Subscriptions = Arc::default();
        let worker = tokio::spawn(deliver(pending, Arc::clone(&subscriptions)));

        (
            Arc::new(Self {
                subscriptions,
                queue,
            }),
            worker,
        )
    }
}

async fn deliver(mut pending: mpsc::Receiver<EventEnvelope>, subscriptions: Subscriptions) {
    while let Some(event) = pending.recv().await {
        let handlers: Vec<Arc<dyn EventHandler>> = subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.event_type)
            .cloned()
            .unwrap_or_default();

        for handler in handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                tracing::warn!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    event_id = %event.event_id,
                    error = %e,
                    "Event handler failed"
                );
            }
        }
    }

    tracing::debug!("Event queue closed");
}

#[async_trait]
impl EventPublisher for DispatchingEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.queue.try_send(event).map_err(|e| match e {
            TrySendError::Full(event) => DomainError::new(
                ErrorCode::InternalError,
                format!("Event queue full, dropped {}", event.event_type),
            ),
            TrySendError::Closed(event) => DomainError::new(
                ErrorCode::InternalError,
                format!("Event queue closed, dropped {}", event.event_type),
            ),
        })
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl EventSubscriber for DispatchingEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        self.subscribe_all(&[event_type], handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for event_type in event_types {
            subscriptions
                .entry(event_type.to_string())
                .or_default()
                .push(Arc::clone(&handler));
        }
    }
}
