//! Chemical inventory records.
//!
//! The inventory document is a JSON array of records (or, as realtime stores
//! export sparse arrays, an object keyed by index). Fields are free text as
//! typed into the form; nothing here validates them beyond shape.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::clock::Clock;
use crate::parse::parse_flexible_date;
use crate::status::{effective_status, Status};
use crate::types::ParsedDate;

/// Errors that can occur while loading an inventory.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The inventory file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or a record has the wrong shape.
    #[error("invalid inventory JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is valid JSON but neither an array nor an object.
    #[error("inventory must be a JSON array or object, found {0}")]
    UnexpectedShape(&'static str),
}

/// GHS hazard pictograms, in the order the inventory shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhsPictogram {
    Explosive,
    Flammable,
    Oxidizing,
    Gas,
    Corrosive,
    Toxic,
    Irritant,
    Health,
    Env,
}

impl GhsPictogram {
    pub const ALL: [GhsPictogram; 9] = [
        Self::Explosive,
        Self::Flammable,
        Self::Oxidizing,
        Self::Gas,
        Self::Corrosive,
        Self::Toxic,
        Self::Irritant,
        Self::Health,
        Self::Env,
    ];

    /// Look a pictogram up by its field name.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Field name in the stored record.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Explosive => "explosive",
            Self::Flammable => "flammable",
            Self::Oxidizing => "oxidizing",
            Self::Gas => "gas",
            Self::Corrosive => "corrosive",
            Self::Toxic => "toxic",
            Self::Irritant => "irritant",
            Self::Health => "health",
            Self::Env => "env",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Explosive => "Explosive",
            Self::Flammable => "Flammable",
            Self::Oxidizing => "Oxidizing",
            Self::Gas => "Compressed Gas",
            Self::Corrosive => "Corrosive",
            Self::Toxic => "Toxic",
            Self::Irritant => "Irritant",
            Self::Health => "Health Hazard",
            Self::Env => "Environmental Hazard",
        }
    }

    #[must_use]
    pub fn label_th(&self) -> &'static str {
        match self {
            Self::Explosive => "วัตถุระเบิด",
            Self::Flammable => "สารไวไฟ",
            Self::Oxidizing => "สารออกซิไดส์",
            Self::Gas => "ก๊าซภายใต้ความดัน",
            Self::Corrosive => "สารกัดกร่อน",
            Self::Toxic => "สารมีพิษ",
            Self::Irritant => "สารระคายเคือง",
            Self::Health => "อันตรายต่อสุขภาพ",
            Self::Env => "อันตรายต่อสิ่งแวดล้อม",
        }
    }
}

/// Which GHS pictograms apply to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GhsFlags {
    pub explosive: bool,
    pub flammable: bool,
    pub oxidizing: bool,
    pub gas: bool,
    pub corrosive: bool,
    pub toxic: bool,
    pub irritant: bool,
    pub health: bool,
    pub env: bool,
}

impl GhsFlags {
    #[must_use]
    pub fn has(&self, pictogram: GhsPictogram) -> bool {
        match pictogram {
            GhsPictogram::Explosive => self.explosive,
            GhsPictogram::Flammable => self.flammable,
            GhsPictogram::Oxidizing => self.oxidizing,
            GhsPictogram::Gas => self.gas,
            GhsPictogram::Corrosive => self.corrosive,
            GhsPictogram::Toxic => self.toxic,
            GhsPictogram::Irritant => self.irritant,
            GhsPictogram::Health => self.health,
            GhsPictogram::Env => self.env,
        }
    }

    /// Set pictograms in display order.
    #[must_use]
    pub fn active(&self) -> Vec<GhsPictogram> {
        GhsPictogram::ALL
            .into_iter()
            .filter(|p| self.has(*p))
            .collect()
    }
}

/// One chemical on the shelf.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChemicalRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    /// CAS registry number, unvalidated.
    #[serde(deserialize_with = "lenient_text")]
    pub cas: String,
    /// Comma-separated hazard classes.
    #[serde(deserialize_with = "lenient_text")]
    pub hazard: String,
    /// Remaining quantity with its unit, e.g. `"500 mL"`.
    #[serde(deserialize_with = "lenient_text")]
    pub remaining: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(deserialize_with = "lenient_text")]
    pub import_date: String,
    /// Free-text expiry, interpreted on read by [`parse_flexible_date`].
    #[serde(deserialize_with = "lenient_text")]
    pub expiry: String,
    #[serde(deserialize_with = "lenient_text")]
    pub expiration_note: String,
    pub status: Status,
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
    pub ghs: GhsFlags,
}

impl ChemicalRecord {
    /// Hazard classes from the comma-separated `hazard` field.
    #[must_use]
    pub fn hazards(&self) -> Vec<&str> {
        self.hazard
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty() && *h != "-")
            .collect()
    }

    /// The interpreted expiry, if the field can be read.
    #[must_use]
    pub fn parsed_expiry(&self) -> Option<ParsedDate> {
        parse_flexible_date(&self.expiry)
    }

    /// Status to display for this record as of `clock`.
    #[must_use]
    pub fn effective_status(&self, clock: &dyn Clock) -> Status {
        effective_status(&self.status, &self.expiry, clock)
    }

    /// `last_updated` as `DD/MM/YYYY at HH:mm` local time.
    #[must_use]
    pub fn last_updated_display(&self) -> String {
        format_timestamp(self.last_updated, &Local)
    }
}

/// Format epoch milliseconds as `DD/MM/YYYY at HH:mm` in `tz`.
///
/// A missing or zero timestamp reads as `-`.
///
/// ```
/// use chemshelf_core::format_timestamp;
/// use chrono::Utc;
///
/// assert_eq!(format_timestamp(Some(1_718_454_600_000), &Utc), "15/06/2024 at 12:30");
/// assert_eq!(format_timestamp(None, &Utc), "-");
/// ```
#[must_use]
pub fn format_timestamp<Tz>(millis: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    millis
        .filter(|m| *m != 0)
        .and_then(|m| tz.timestamp_millis_opt(m).single())
        .map(|t| t.format("%d/%m/%Y at %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Strings, numbers and null all read as text; form fields were never typed.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        other => other.to_string(),
    })
}

/// A record's expiry reading at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStatus {
    pub id: String,
    pub name: String,
    pub expiry: String,
    pub parsed_expiry: Option<ParsedDate>,
    pub stored_status: Status,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

impl RecordStatus {
    /// Read `record` as of `clock`.
    #[must_use]
    pub fn of(record: &ChemicalRecord, clock: &dyn Clock) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            expiry: record.expiry.clone(),
            parsed_expiry: record.parsed_expiry(),
            stored_status: record.status.clone(),
            status: record.effective_status(clock),
            last_updated: record.last_updated,
        }
    }

    /// Whether the status was switched to `Expired` by the expiry date.
    #[must_use]
    pub fn is_auto_expired(&self) -> bool {
        self.status == Status::Expired && self.stored_status != Status::Expired
    }
}

/// Dashboard counts over effective statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub ready: usize,
    pub expired: usize,
    pub dispose: usize,
    pub flammable: usize,
}

/// Narrows an inventory the way the dashboard filters do.
///
/// Unset fields match everything. `search` is a case-insensitive substring of
/// the name or id, or a plain substring of the CAS number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    /// Compared against the effective status, so `Expired` includes records
    /// whose expiry has passed.
    pub status: Option<Status>,
    pub ghs: Option<GhsPictogram>,
    pub expiration_note: Option<String>,
}

impl InventoryQuery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `record` passes every set filter as of `clock`.
    #[must_use]
    pub fn matches(&self, record: &ChemicalRecord, clock: &dyn Clock) -> bool {
        if let Some(term) = &self.search {
            let lower = term.to_lowercase();
            let found = record.name.to_lowercase().contains(&lower)
                || record.id.to_lowercase().contains(&lower)
                || record.cas.contains(term.as_str());
            if !found {
                return false;
            }
        }
        if self.location.as_ref().is_some_and(|l| *l != record.location) {
            return false;
        }
        if self.ghs.is_some_and(|p| !record.ghs.has(p)) {
            return false;
        }
        if self
            .expiration_note
            .as_ref()
            .is_some_and(|n| *n != record.expiration_note)
        {
            return false;
        }
        match &self.status {
            Some(status) => record.effective_status(clock) == *status,
            None => true,
        }
    }
}

/// All records in an inventory document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub records: Vec<ChemicalRecord>,
}

impl Inventory {
    /// Parse an inventory document.
    ///
    /// Accepts a JSON array (null holes are skipped) or an object whose
    /// values are records. Object entries are taken in numeric key order,
    /// with any non-numeric keys after them.
    pub fn from_json(json: &str) -> Result<Self, InventoryError> {
        let document: JsonValue = serde_json::from_str(json)?;
        let values = match document {
            JsonValue::Array(items) => items,
            JsonValue::Object(map) => {
                let mut entries: Vec<_> = map.into_iter().collect();
                entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
                entries.into_iter().map(|(_, v)| v).collect()
            }
            JsonValue::Null => Vec::new(),
            JsonValue::Bool(_) => return Err(InventoryError::UnexpectedShape("a boolean")),
            JsonValue::Number(_) => return Err(InventoryError::UnexpectedShape("a number")),
            JsonValue::String(_) => return Err(InventoryError::UnexpectedShape("a string")),
        };

        let records = values
            .into_iter()
            .filter(|v| !v.is_null())
            .map(serde_json::from_value)
            .collect::<Result<Vec<ChemicalRecord>, _>>()?;
        tracing::debug!("loaded {} inventory records", records.len());
        Ok(Self { records })
    }

    /// Read and parse an inventory file.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let contents = std::fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Expiry readings for every record as of `clock`.
    #[must_use]
    pub fn evaluate(&self, clock: &dyn Clock) -> Vec<RecordStatus> {
        self.records
            .iter()
            .map(|record| RecordStatus::of(record, clock))
            .collect()
    }

    /// Records passing `query`, in document order.
    #[must_use]
    pub fn filter(&self, query: &InventoryQuery, clock: &dyn Clock) -> Vec<&ChemicalRecord> {
        let matched: Vec<_> = self
            .records
            .iter()
            .filter(|record| query.matches(record, clock))
            .collect();
        tracing::debug!("{} of {} records match", matched.len(), self.records.len());
        matched
    }

    /// Distinct non-empty locations, sorted.
    #[must_use]
    pub fn locations(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.location.as_str()))
    }

    /// Distinct `hazard` field values, sorted, without the `-` placeholder.
    #[must_use]
    pub fn hazards(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.hazard.as_str()))
    }

    /// Distinct expiration notes, sorted, without the `-` placeholder.
    #[must_use]
    pub fn expiration_notes(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.expiration_note.as_str()))
    }

    /// Dashboard counts as of `clock`.
    #[must_use]
    pub fn stats(&self, clock: &dyn Clock) -> InventoryStats {
        let mut stats = InventoryStats {
            total: self.records.len(),
            ..InventoryStats::default()
        };
        for record in &self.records {
            match record.effective_status(clock) {
                Status::Ready => stats.ready += 1,
                Status::Expired => stats.expired += 1,
                Status::Dispose => stats.dispose += 1,
                _ => {}
            }
            if record.ghs.flammable {
                stats.flammable += 1;
            }
        }
        stats
    }
}

/// Numeric keys by value, then the rest lexicographically.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "-")
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
