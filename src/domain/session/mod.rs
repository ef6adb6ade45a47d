//! Session domain module.
//!
//! Handles the lifecycle of booked teaching sessions: validation at
//! booking, the `pending → confirmed → completed` path, cancellation with
//! refund or forfeiture, rating, and meeting room assignment.
//!
//! # Events
//!
//! - `SessionBooked` - Published when a learner books a session
//! - `SessionConfirmed` - Published when the instructor confirms
//! - `SessionCompleted` - Published when the instructor completes
//! - `SessionCancelled` - Published when either participant cancels
//! - `SessionRated` - Published when the learner rates
//! - `MeetingRoomAssigned` - Published when the first join creates a room

mod aggregate;
mod cancellation;
mod errors;
mod events;
mod validator;

pub use aggregate::{
    CancellationOutcome, ParticipantRole, Session, MAX_REVIEW_LENGTH,
};
pub use cancellation::CancellationPolicy;
pub use errors::{transition_rejected, SessionError, SessionTransition};
pub use events::{
    MeetingRoomAssigned, SessionBooked, SessionCancelled, SessionCompleted, SessionConfirmed,
    SessionRated,
};
pub use validator::{validate_booking, BookingDraft, BookingRequest};
