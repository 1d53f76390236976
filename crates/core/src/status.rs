//! Record status and the automatic "Expired" override.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::expiry::check_is_expired_with;

/// Stored status of an inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Available for use. The default for new records.
    #[default]
    Ready,
    NotReady,
    Expired,
    /// Queued for disposal.
    Dispose,
    Donate,
    /// A value this version does not know, kept as written.
    Other(String),
}

impl Status {
    /// The stored string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "Ready",
            Self::NotReady => "Not Ready",
            Self::Expired => "Expired",
            Self::Dispose => "Dispose",
            Self::Donate => "Donate",
            Self::Other(s) => s,
        }
    }

    /// Thai label shown in the inventory UI.
    #[must_use]
    pub fn label_th(&self) -> &str {
        match self {
            Self::Ready => "พร้อมใช้งาน",
            Self::NotReady => "ไม่พร้อมใช้งาน",
            Self::Expired => "หมดอายุ",
            Self::Dispose => "ส่งกำจัด",
            Self::Donate => "บริจาค",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            // Older exports stored availability as a checkbox value
            "Ready" | "TRUE" => Self::Ready,
            "Not Ready" => Self::NotReady,
            "Expired" => Self::Expired,
            "Dispose" => Self::Dispose,
            "Donate" => Self::Donate,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        match value {
            Status::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The status to display for a record.
///
/// Only a `Ready` record is ever switched to `Expired`; a status someone set
/// by hand is left alone even when the expiry has passed.
#[must_use]
pub fn effective_status(stored: &Status, expiry: &str, clock: &dyn Clock) -> Status {
    if *stored == Status::Ready && check_is_expired_with(expiry, clock) {
        tracing::trace!("expiry {:?} has passed, showing Expired", expiry);
        Status::Expired
    } else {
        stored.clone()
    }
}
