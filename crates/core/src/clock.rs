//! Wall-clock sources.
//!
//! Expiry checks never read the system time directly; they take a [`Clock`]
//! so the same code runs against a fixed instant in tests and in the CLI's
//! `--today` mode.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// A source of the current local time.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// A clock frozen at midnight of `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Truncate to 00:00:00 of the same day.
#[must_use]
pub fn start_of_day(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_day_truncates() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        let start = start_of_day(now);
        assert_eq!(start.date(), now.date());
        assert_eq!(start.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(clock.now(), clock.now());
    }
}
