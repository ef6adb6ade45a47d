//! Notifier adapter that writes notifications to the structured log.
//!
//! Stands in for an email or push gateway; the delivery channel is an
//! operational concern outside the booking core.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{Notification, Notifier};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        tracing::info!(
            recipient = %notification.recipient.id,
            session_id = %notification.session_id,
            kind = ?notification.kind,
            message = %notification.message,
            "Notification dispatched"
        );
        Ok(())
    }
}
