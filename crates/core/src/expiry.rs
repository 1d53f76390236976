//! Expiry verdicts.

use chrono::NaiveDateTime;

use crate::clock::{start_of_day, Clock, SystemClock};
use crate::parse::parse_flexible_date;
use crate::types::ParsedDate;

/// Whether the item whose expiry field reads `input` has expired, as of the
/// system's local time right now.
///
/// Text that does not parse is never expired.
#[must_use]
pub fn check_is_expired(input: &str) -> bool {
    check_is_expired_with(input, &SystemClock)
}

/// [`check_is_expired`] against an explicit clock.
///
/// # Examples
///
/// ```
/// use chemshelf_core::{check_is_expired_with, FixedClock};
/// use chrono::NaiveDate;
///
/// let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
/// assert!(check_is_expired_with("15/06/2024", &clock));
/// assert!(!check_is_expired_with("2025", &clock));
/// assert!(!check_is_expired_with("expired long ago", &clock));
/// ```
#[must_use]
pub fn check_is_expired_with(input: &str, clock: &dyn Clock) -> bool {
    match parse_flexible_date(input) {
        Some(parsed) => is_expired_at(&parsed, clock.now()),
        None => false,
    }
}

/// A parsed expiry has passed once it falls before the start of `now`'s day.
///
/// An item expiring any time today is still good today.
#[must_use]
pub fn is_expired_at(parsed: &ParsedDate, now: NaiveDateTime) -> bool {
    parsed.datetime < start_of_day(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock_at(year: i32, month: u32, day: u32, hour: u32) -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_unparseable_is_never_expired() {
        let clock = clock_at(2030, 1, 1, 12);
        for input in ["", "-", "   ", "expired", "หมดอายุ", "31/02/2000", "1/2/3/4"] {
            assert!(!check_is_expired_with(input, &clock), "{input:?}");
        }
    }

    #[test]
    fn test_past_day_is_expired() {
        let clock = clock_at(2024, 6, 16, 9);
        assert!(check_is_expired_with("15/06/2024", &clock));
    }

    #[test]
    fn test_same_day_is_not_expired() {
        let clock = clock_at(2024, 6, 15, 23);
        assert!(!check_is_expired_with("15/06/2024", &clock));
    }

    #[test]
    fn test_month_granularity_gets_the_whole_month() {
        let clock = clock_at(2024, 6, 30, 18);
        assert!(!check_is_expired_with("06/2024", &clock));

        let clock = clock_at(2024, 7, 1, 0);
        assert!(check_is_expired_with("06/2024", &clock));
    }

    #[test]
    fn test_year_granularity_gets_the_whole_year() {
        let clock = clock_at(2024, 12, 31, 23);
        assert!(!check_is_expired_with("2024", &clock));
        assert!(!check_is_expired_with("2567", &clock));

        let clock = clock_at(2025, 1, 1, 0);
        assert!(check_is_expired_with("2024", &clock));
        assert!(check_is_expired_with("2567", &clock));
    }

    #[test]
    fn test_end_of_day_boundary() {
        // Parsed to today 23:59:59: good until the day rolls over
        let clock = clock_at(2026, 5, 31, 0);
        assert!(!check_is_expired_with("พ.ค.-26", &clock));
        let clock = clock_at(2026, 6, 1, 0);
        assert!(check_is_expired_with("พ.ค.-26", &clock));
    }

    #[test]
    fn test_same_input_same_clock_agrees() {
        let clock = clock_at(2025, 3, 10, 8);
        for input in ["9/11/2026", "01/2025", "2024", "nonsense"] {
            assert_eq!(
                check_is_expired_with(input, &clock),
                check_is_expired_with(input, &clock)
            );
        }
    }

    #[test]
    fn test_system_clock_far_future_and_past() {
        assert!(check_is_expired("01/01/1990"));
        assert!(!check_is_expired("31/12/2399"));
        assert!(!check_is_expired("-"));
    }
}
