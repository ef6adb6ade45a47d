//! Clock adapters.

use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Settable clock for deterministic tests.
///
/// Always returns the same time until moved with `set` or `advance_minutes`.
#[derive(Debug)]
pub struct FixedClock {
    time: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn new(time: Timestamp) -> Self {
        Self {
            time: RwLock::new(time),
        }
    }

    pub fn set(&self, time: Timestamp) {
        *self.time.write().unwrap_or_else(PoisonError::into_inner) = time;
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut time = self.time.write().unwrap_or_else(PoisonError::into_inner);
        *time = time.plus_minutes(minutes);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.time.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable_until_moved() {
        let start = Timestamp::now();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), clock.now());

        clock.advance_minutes(90);
        assert_eq!(clock.now(), start.plus_minutes(90));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(!b.is_before(&a));
    }
}
