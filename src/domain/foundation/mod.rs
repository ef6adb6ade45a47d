//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the skill exchange domain.

mod auth;
mod command;
mod errors;
mod events;
mod ids;
mod rating;
mod session_status;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{CreditTransactionId, MeetingRoomId, SessionId, UserId};
pub use rating::Rating;
pub use session_status::SessionStatus;
pub use state_machine::{IllegalTransition, StateMachine};
pub use timestamp::Timestamp;
