//! Clock port - the single source of "now" for time-dependent rules.
//!
//! Booking requires a future start time and cancellation compares calendar
//! days, so handlers never call `Timestamp::now()` directly.

use crate::domain::foundation::Timestamp;

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
