//! Cancellation policy: same-day cancellations forfeit the reservation.

use chrono::{FixedOffset, Offset, Utc};

use crate::domain::foundation::Timestamp;

/// Decides whether a cancellation refunds or forfeits the reserved credits.
///
/// The calendar day is evaluated in a single configured UTC offset, so the
/// rule is the same no matter which participant cancels or where they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationPolicy {
    offset: FixedOffset,
}

impl CancellationPolicy {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Policy evaluated on UTC calendar days.
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Builds a policy from an offset in minutes east of UTC.
    ///
    /// Returns `None` when the offset is outside ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// True when `now` falls on the same local calendar day as `start`.
    pub fn is_same_day(&self, start: &Timestamp, now: &Timestamp) -> bool {
        start.local_date(&self.offset) == now.local_date(&self.offset)
    }

    /// True when cancelling at `now` returns the reservation to the learner.
    pub fn refunds(&self, start: &Timestamp, now: &Timestamp) -> bool {
        !self.is_same_day(start, now)
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap())
    }

    #[test]
    fn same_utc_day_forfeits_regardless_of_hours_remaining() {
        let policy = CancellationPolicy::utc();
        assert!(policy.is_same_day(&at(10, 23, 0), &at(10, 0, 5)));
        assert!(!policy.refunds(&at(10, 23, 0), &at(10, 0, 5)));
    }

    #[test]
    fn previous_day_refunds_even_minutes_before_start() {
        let policy = CancellationPolicy::utc();
        assert!(policy.refunds(&at(11, 0, 10), &at(10, 23, 55)));
    }

    #[test]
    fn offset_moves_the_day_boundary() {
        // 22:30 UTC on the 9th is 00:30 on the 10th at UTC+2.
        let plus_two = CancellationPolicy::from_offset_minutes(120).unwrap();
        let start = at(10, 8, 0);
        let now = at(9, 22, 30);

        assert!(plus_two.is_same_day(&start, &now));
        assert!(!CancellationPolicy::utc().is_same_day(&start, &now));
    }

    #[test]
    fn rejects_offsets_beyond_a_day() {
        assert!(CancellationPolicy::from_offset_minutes(24 * 60).is_none());
        assert!(CancellationPolicy::from_offset_minutes(-330).is_some());
    }
}
