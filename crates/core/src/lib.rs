//! Chemshelf Core
//!
//! Interprets the hand-typed expiry fields of a chemical inventory and
//! decides which items have expired. Expiry text mixes Thai and English
//! month names, Buddhist Era and Gregorian years, and numeric day-first
//! dates; the engine reads all of them and never fails on bad input.
//!
//! # Quick Start
//!
//! ```
//! use chemshelf_core::{parse_flexible_date, check_is_expired_with, FixedClock, Granularity};
//! use chrono::NaiveDate;
//!
//! // Buddhist Era year, rounded up to the end of the year
//! let parsed = parse_flexible_date("2567").unwrap();
//! assert_eq!(parsed.year(), 2024);
//! assert_eq!(parsed.granularity, Granularity::Year);
//!
//! // Expiry checks take a clock so they can be pinned to a day
//! let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
//! assert!(check_is_expired_with("2567", &clock));
//! assert!(!check_is_expired_with("มกราคม 2568", &clock));
//! ```
//!
//! # Inventory
//!
//! ```
//! use chemshelf_core::{FixedClock, Inventory, Status};
//! use chrono::NaiveDate;
//!
//! let inventory = Inventory::from_json(
//!     r#"[{ "id": "C-1", "name": "Acetone", "expiry": "06/2024", "status": "Ready" }]"#,
//! ).unwrap();
//! let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
//! assert_eq!(inventory.evaluate(&clock)[0].status, Status::Expired);
//! ```

pub mod clock;
pub mod expiry;
pub mod inventory;
pub mod months;
pub mod parse;
pub mod status;
pub mod types;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// This is UTF-8 safe - it counts characters, not bytes.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

pub use clock::{start_of_day, Clock, FixedClock, SystemClock};
pub use expiry::{check_is_expired, check_is_expired_with, is_expired_at};
pub use inventory::{
    format_timestamp, ChemicalRecord, GhsFlags, GhsPictogram, Inventory, InventoryError,
    InventoryQuery, InventoryStats, RecordStatus,
};
pub use months::{MonthMatcher, SubstringMonthMatcher};
pub use parse::{
    buddhist_to_gregorian, normalize_year, parse_flexible_date, parse_flexible_date_with,
};
pub use status::{effective_status, Status};
pub use types::{Granularity, ParsedDate};
