//! Month-name tables and the matcher that finds a month inside free text.

/// Thai month abbreviations, January first.
pub const THAI_ABBREVIATIONS: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.",
    "ธ.ค.",
];

/// Thai full month names, January first.
pub const THAI_FULL_NAMES: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

/// Lower-case English three-letter month codes, January first.
pub const ENGLISH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Tables in scan order. Later tables overwrite earlier hits.
pub const MONTH_TABLES: [&[&str; 12]; 3] =
    [&THAI_ABBREVIATIONS, &THAI_FULL_NAMES, &ENGLISH_ABBREVIATIONS];

/// Finds a month name inside an expiry expression.
pub trait MonthMatcher: Send + Sync {
    /// Returns the 1-based month named somewhere in `lower`, which the caller
    /// has already trimmed and lower-cased.
    fn find_month(&self, lower: &str) -> Option<u32>;
}

/// Permissive matcher: any table entry appearing as a raw substring counts.
///
/// All three tables are scanned in full and every hit overwrites the
/// previous one, so with conflicting names the English code wins over Thai,
/// and within a table the later month wins. A name buried inside an
/// unrelated word still matches (`"decant"` reads as December).
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMonthMatcher;

impl MonthMatcher for SubstringMonthMatcher {
    fn find_month(&self, lower: &str) -> Option<u32> {
        let mut month = None;
        for table in MONTH_TABLES {
            for (index, name) in table.iter().enumerate() {
                if lower.contains(name) {
                    month = Some(index as u32 + 1);
                }
            }
        }
        month
    }
}
