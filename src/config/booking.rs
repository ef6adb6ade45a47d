//! Booking rules configuration

use chrono::FixedOffset;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::session::CancellationPolicy;

const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Settings for the booking rules that depend on local time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingConfig {
    /// Marketplace timezone as minutes east of UTC. Decides which calendar
    /// day a cancellation falls on.
    #[serde(default)]
    pub timezone_offset_minutes: i32,
}

impl BookingConfig {
    pub fn offset(&self) -> Result<FixedOffset, ValidationError> {
        if self.timezone_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ValidationError::InvalidTimezoneOffset);
        }
        FixedOffset::east_opt(self.timezone_offset_minutes * 60)
            .ok_or(ValidationError::InvalidTimezoneOffset)
    }

    pub fn cancellation_policy(&self) -> Result<CancellationPolicy, ValidationError> {
        self.validate()?;
        CancellationPolicy::from_offset_minutes(self.timezone_offset_minutes)
            .ok_or(ValidationError::InvalidTimezoneOffset)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.offset().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_utc() {
        let config = BookingConfig::default();
        assert_eq!(config.offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn offset_east_of_utc() {
        let config = BookingConfig {
            timezone_offset_minutes: 330,
        };
        assert_eq!(config.offset().unwrap().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn policy_uses_configured_offset() {
        let config = BookingConfig {
            timezone_offset_minutes: -300,
        };
        let policy = config.cancellation_policy().unwrap();
        assert_eq!(policy.offset().local_minus_utc(), -300 * 60);
    }

    #[test]
    fn offset_beyond_eighteen_hours_is_rejected() {
        let config = BookingConfig {
            timezone_offset_minutes: -(19 * 60),
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimezoneOffset));
    }
}
