//! Event handlers that notify session participants.

mod session_notification_handler;

pub use session_notification_handler::{SessionNotificationHandler, NOTIFIED_EVENT_TYPES};
