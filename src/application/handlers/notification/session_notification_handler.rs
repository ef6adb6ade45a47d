//! SessionNotificationHandler - Event handler that tells participants what
//! happened to their sessions.
//!
//! - `session.booked.v1` → instructor gets a booking request
//! - `session.confirmed.v1` → learner learns the booking was accepted
//! - `session.cancelled.v1` → the participant who did not cancel is told
//!
//! Notifications are fire-and-forget: the session change has already been
//! committed when this runs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, UserId};
use crate::domain::session::{ParticipantRole, SessionBooked, SessionCancelled, SessionConfirmed};
use crate::domain::user::UserContact;
use crate::ports::{EventHandler, Notification, NotificationKind, Notifier, UserDirectory};

/// Event types this handler subscribes to.
pub const NOTIFIED_EVENT_TYPES: [&str; 3] = [
    "session.booked.v1",
    "session.confirmed.v1",
    "session.cancelled.v1",
];

pub struct SessionNotificationHandler {
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl SessionNotificationHandler {
    pub fn new(users: Arc<dyn UserDirectory>, notifier: Arc<dyn Notifier>) -> Self {
        Self { users, notifier }
    }

    async fn contact(&self, id: &UserId) -> Result<UserContact, DomainError> {
        self.users
            .find_contacts(std::slice::from_ref(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", id))
                    .with_detail("user_id", id.as_str())
            })
    }

    fn notification_for_booking(event: SessionBooked) -> Notification {
        Notification {
            message: format!(
                "{} requested a {}-minute {} session starting {}",
                event.learner.name,
                event.duration_minutes,
                event.skill,
                event.start_time.as_datetime().to_rfc3339()
            ),
            recipient: event.instructor,
            session_id: event.session_id,
            kind: NotificationKind::BookingRequested,
        }
    }

    async fn notification_for_confirmation(
        &self,
        event: SessionConfirmed,
    ) -> Result<Notification, DomainError> {
        Ok(Notification {
            recipient: self.contact(&event.learner_id).await?,
            session_id: event.session_id,
            kind: NotificationKind::BookingConfirmed,
            message: format!(
                "Your {} session starting {} was confirmed",
                event.skill,
                event.start_time.as_datetime().to_rfc3339()
            ),
        })
    }

    async fn notification_for_cancellation(
        &self,
        event: SessionCancelled,
    ) -> Result<Notification, DomainError> {
        let recipient = match event.cancelled_by_role {
            ParticipantRole::Instructor => &event.learner_id,
            ParticipantRole::Learner => &event.instructor_id,
        };
        let message = if event.refunded > 0 {
            format!(
                "The {} cancelled your session; {} credits were refunded",
                event.cancelled_by_role, event.refunded
            )
        } else {
            format!(
                "The {} cancelled your session on the day it was due",
                event.cancelled_by_role
            )
        };

        Ok(Notification {
            recipient: self.contact(recipient).await?,
            session_id: event.session_id,
            kind: NotificationKind::SessionCancelled,
            message,
        })
    }
}

fn malformed(event: &EventEnvelope, e: serde_json::Error) -> DomainError {
    DomainError::new(
        ErrorCode::ValidationFailed,
        format!("Malformed {} payload: {}", event.event_type, e),
    )
}

#[async_trait]
impl EventHandler for SessionNotificationHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let notification = match event.event_type.as_str() {
            "session.booked.v1" => {
                let payload: SessionBooked =
                    event.payload_as().map_err(|e| malformed(&event, e))?;
                Self::notification_for_booking(payload)
            }
            "session.confirmed.v1" => {
                let payload: SessionConfirmed =
                    event.payload_as().map_err(|e| malformed(&event, e))?;
                self.notification_for_confirmation(payload).await?
            }
            "session.cancelled.v1" => {
                let payload: SessionCancelled =
                    event.payload_as().map_err(|e| malformed(&event, e))?;
                self.notification_for_cancellation(payload).await?
            }
            other => {
                debug!(event_type = other, "Ignoring event");
                return Ok(());
            }
        };

        self.notifier.notify(notification).await
    }

    fn name(&self) -> &'static str {
        "SessionNotificationHandler"
    }
}
