//! Core types for Chemshelf.
//!
//! These types represent what the date engine produces from a free-text expiry.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// How precisely the source text pinned down the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// An exact calendar day (`15/06/2024`).
    Day,
    /// Month and year only (`06/2024`, `พ.ค.-26`).
    Month,
    /// A bare year (`2024`, `2567`).
    Year,
}

impl Granularity {
    /// Returns the granularity name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete local date-time interpreted from an expiry expression.
///
/// Coarse inputs are rounded up: a month or year holds the last second of
/// that period, so "good until 2024" means good through 2024-12-31 23:59:59.
/// Exact days hold midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParsedDate {
    pub datetime: NaiveDateTime,
    pub granularity: Granularity,
}

impl ParsedDate {
    /// An exact day at 00:00:00.
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self {
            datetime: date.and_time(NaiveTime::MIN),
            granularity: Granularity::Day,
        }
    }

    /// The last second of the month containing `year`/`month` (1-based).
    #[must_use]
    pub fn end_of_month(year: i32, month: u32) -> Option<Self> {
        let first_of_next = match month {
            12 => NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?,
            1..=11 => NaiveDate::from_ymd_opt(year, month + 1, 1)?,
            _ => return None,
        };
        let last = first_of_next.pred_opt()?;
        Some(Self {
            datetime: last.and_time(end_of_day()),
            granularity: Granularity::Month,
        })
    }

    /// December 31 of `year` at 23:59:59.
    #[must_use]
    pub fn end_of_year(year: i32) -> Option<Self> {
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self {
            datetime: last.and_time(end_of_day()),
            granularity: Granularity::Year,
        })
    }

    /// The calendar date part.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn year(&self) -> i32 {
        self.datetime.year()
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.datetime.month()
    }

    pub fn day_of_month(&self) -> u32 {
        self.datetime.day()
    }
}

impl std::fmt::Display for ParsedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.granularity {
            Granularity::Day => write!(f, "{}", self.datetime.format("%d/%m/%Y")),
            Granularity::Month | Granularity::Year => {
                write!(f, "{}", self.datetime.format("%d/%m/%Y %H:%M:%S"))
            }
        }
    }
}

/// 23:59:59, the instant coarse dates round up to.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}
