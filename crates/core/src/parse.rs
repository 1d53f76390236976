//! Flexible expiry-date parsing.
//!
//! Expiry fields are typed by hand and arrive in whatever shape the person
//! at the shelf preferred:
//! - Bare years: `2026`, `2569` (Buddhist Era)
//! - Month names with a year: `พ.ค.-26`, `มกราคม 2568`, `Mar 2025`
//! - Day, month name and year: `3 Mar 2025`, `26-พ.ค.`
//! - Numeric dates: `15/06/2024`, `9-11-2026`, `01.02.67`
//! - Numeric month and year: `06/2024`
//!
//! Rules are tried in that order and the first one producing a date wins.
//! Numeric dates are always day-first. Anything unrecognized is "no date",
//! never an error.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::months::{MonthMatcher, SubstringMonthMatcher};
use crate::types::ParsedDate;

/// Placeholder the inventory uses for "no expiry recorded".
pub const PLACEHOLDER: &str = "-";

/// Years above this are read as Buddhist Era.
pub const BUDDHIST_ERA_THRESHOLD: i32 = 2400;

/// Buddhist Era minus Gregorian.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

fn patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(DatePatterns::new)
}

struct DatePatterns {
    // 2024, 2567
    bare_year: Regex,
    // Any maximal run of ASCII digits
    digit_run: Regex,
}

impl DatePatterns {
    fn new() -> Self {
        Self {
            bare_year: Regex::new(r"^[0-9]{4}$").unwrap(),
            digit_run: Regex::new(r"[0-9]+").unwrap(),
        }
    }
}

/// Convert a Buddhist Era year to Gregorian when it looks like one.
#[must_use]
pub fn buddhist_to_gregorian(year: i32) -> i32 {
    if year > BUDDHIST_ERA_THRESHOLD {
        tracing::trace!("year {} read as BE, using {}", year, year - BUDDHIST_ERA_OFFSET);
        year - BUDDHIST_ERA_OFFSET
    } else {
        year
    }
}

/// Expand a two-digit year into the 2000s, then apply the BE conversion.
#[must_use]
pub fn normalize_year(year: i32) -> i32 {
    let year = if (0..100).contains(&year) {
        year + 2000
    } else {
        year
    };
    buddhist_to_gregorian(year)
}

/// Interpret a free-text expiry expression.
///
/// Returns `None` for empty input, the `-` placeholder, and anything the
/// rules cannot turn into a real calendar date.
///
/// # Examples
///
/// ```
/// use chemshelf_core::{parse_flexible_date, Granularity};
///
/// let exact = parse_flexible_date("15/06/2024").unwrap();
/// assert_eq!(exact.to_string(), "15/06/2024");
///
/// // Month and year round up to the last second of the month
/// let coarse = parse_flexible_date("พ.ค.-26").unwrap();
/// assert_eq!(coarse.granularity, Granularity::Month);
/// assert_eq!(coarse.to_string(), "31/05/2026 23:59:59");
///
/// assert!(parse_flexible_date("-").is_none());
/// ```
#[must_use]
pub fn parse_flexible_date(input: &str) -> Option<ParsedDate> {
    parse_flexible_date_with(input, &SubstringMonthMatcher)
}

/// [`parse_flexible_date`] with a custom month-name policy.
#[must_use]
pub fn parse_flexible_date_with(input: &str, months: &dyn MonthMatcher) -> Option<ParsedDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER {
        return None;
    }
    let lower = trimmed.to_lowercase();

    let parsed = parse_bare_year(&lower)
        .or_else(|| parse_named_month(&lower, months))
        .or_else(|| parse_separated(&lower));

    match &parsed {
        Some(date) => tracing::debug!(
            "{:?} -> {} ({})",
            trimmed,
            date.datetime,
            date.granularity
        ),
        None => tracing::debug!("{:?} -> no date", trimmed),
    }
    parsed
}

/// `2024` -> 2024-12-31 23:59:59
fn parse_bare_year(lower: &str) -> Option<ParsedDate> {
    if !patterns().bare_year.is_match(lower) {
        return None;
    }
    let year: i32 = lower.parse().ok()?;
    ParsedDate::end_of_year(buddhist_to_gregorian(year))
}

/// `พ.ค.-26`, `3 mar 2025`, `26-พ.ค.`
///
/// The year is the first 2- or 4-digit run anywhere in the text, and a 1-2
/// digit run at the very start is the day. Both can be the same run, so
/// `26-พ.ค.` is 26 May 2026 and `15 ม.ค. 2567` is 15 January 2015.
fn parse_named_month(lower: &str, months: &dyn MonthMatcher) -> Option<ParsedDate> {
    let month = months.find_month(lower)?;

    let mut runs = patterns().digit_run.find_iter(lower);
    let first = runs.next();
    let leading_day = first.filter(|run| run.start() == 0 && run.len() <= 2);

    let year_token = first
        .into_iter()
        .chain(runs)
        .find(|run| run.len() == 2 || run.len() == 4);
    let Some(year_token) = year_token else {
        tracing::trace!("month {} found but no year token, falling through", month);
        return None;
    };
    let year = normalize_year(year_token.as_str().parse().ok()?);

    match leading_day {
        Some(day) => {
            let day: u32 = day.as_str().parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day).map(ParsedDate::day)
        }
        None => ParsedDate::end_of_month(year, month),
    }
}

/// `15/06/2024`, `9-11-2026`, `06/2024`
fn parse_separated(lower: &str) -> Option<ParsedDate> {
    let parts: Vec<&str> = lower.split(['/', '-', '.']).collect();
    match parts.as_slice() {
        [day, month, year] => {
            let day = leading_int(day)?;
            let month = leading_int(month)?;
            let year = normalize_year(leading_int(year)? as i32);
            NaiveDate::from_ymd_opt(year, month, day).map(ParsedDate::day)
        }
        [month, year] => {
            let month = leading_int(month)?;
            let year = normalize_year(leading_int(year)? as i32);
            ParsedDate::end_of_month(year, month)
        }
        _ => None,
    }
}

/// Leading digits of a part, ignoring surrounding whitespace and any
/// trailing text. `" 2024 (opened)"` reads as 2024.
fn leading_int(part: &str) -> Option<u32> {
    let part = part.trim_start();
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    let value: u32 = part[..end].parse().ok()?;
    // Keep the i32 cast in callers lossless.
    (value <= i32::MAX as u32).then_some(value)
}
