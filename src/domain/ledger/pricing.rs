//! Session pricing in time credits.

/// One credit buys this many minutes of teaching.
pub const MINUTES_PER_CREDIT: i64 = 30;

/// Credits charged for a session of the given length: `ceil(minutes / 30)`.
///
/// Returns `None` for non-positive durations and for durations whose price
/// does not fit a balance.
pub fn credits_for_duration(duration_minutes: i64) -> Option<u32> {
    if duration_minutes <= 0 {
        return None;
    }
    let credits = duration_minutes.checked_add(MINUTES_PER_CREDIT - 1)? / MINUTES_PER_CREDIT;
    u32::try_from(credits).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rounds_partial_blocks_up() {
        assert_eq!(credits_for_duration(1), Some(1));
        assert_eq!(credits_for_duration(30), Some(1));
        assert_eq!(credits_for_duration(31), Some(2));
        assert_eq!(credits_for_duration(45), Some(2));
        assert_eq!(credits_for_duration(60), Some(2));
        assert_eq!(credits_for_duration(90), Some(3));
    }

    #[test]
    fn rejects_non_positive_durations() {
        assert_eq!(credits_for_duration(0), None);
        assert_eq!(credits_for_duration(-30), None);
    }

    #[test]
    fn rejects_durations_too_large_to_price() {
        assert_eq!(credits_for_duration(i64::MAX / 2), None);
        assert_eq!(credits_for_duration(i64::MAX), None);
    }

    proptest! {
        #[test]
        fn price_covers_duration_without_a_spare_block(minutes in 1i64..100_000) {
            let credits = credits_for_duration(minutes).unwrap() as i64;
            prop_assert!(credits * MINUTES_PER_CREDIT >= minutes);
            prop_assert!((credits - 1) * MINUTES_PER_CREDIT < minutes);
        }
    }
}
