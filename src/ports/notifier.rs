//! Notifier port - outbound messages to session participants.
//!
//! Fire-and-forget: a failed notification never affects session state.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::user::UserContact;

/// What happened to the session the recipient takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Instructor has a new booking request.
    BookingRequested,
    /// Learner's booking was accepted.
    BookingConfirmed,
    /// The other participant cancelled.
    SessionCancelled,
}

/// A message for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: UserContact,
    pub session_id: SessionId,
    pub kind: NotificationKind,
    pub message: String,
}

/// Port for delivering notifications (email, push, in-app).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn Notifier) {}
}
