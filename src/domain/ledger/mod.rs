//! Ledger module - time credits and the movement journal.
//!
//! A user's balance only changes through a `CreditMovement`. Sessions
//! reserve credits at booking and later settle, refund, or forfeit that
//! reservation; every step is journaled so conservation can be audited.

mod movement;
mod pricing;

pub use movement::{CreditMovement, MovementKind};
pub use pricing::{credits_for_duration, MINUTES_PER_CREDIT};
