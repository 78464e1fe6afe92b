//! Table Occupation Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One interval during which a table is reserved or in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOccupation {
    pub id: i64,
    pub table_id: i64,
    /// The occupation is not in effect before this instant
    pub started_at: DateTime<Utc>,
    /// `None` means open-ended ("open table")
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableOccupation {
    pub fn is_open_ended(&self) -> bool {
        self.finished_at.is_none()
    }

    /// `finished_at` at or before `started_at`.
    ///
    /// Not rejected anywhere on the client; exposed so callers can warn.
    pub fn has_inverted_interval(&self) -> bool {
        self.finished_at.is_some_and(|f| f <= self.started_at)
    }
}

/// Create occupation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOccupationCreate {
    pub table_id: i64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Update occupation payload
///
/// `finished_at` is tri-state: `None` leaves it untouched, `Some(None)`
/// re-opens the occupation (sent as `null`), `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOccupationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::util::double_option"
    )]
    pub finished_at: Option<Option<DateTime<Utc>>>,
}

impl TableOccupationUpdate {
    pub fn is_empty(&self) -> bool {
        self.table_id.is_none() && self.started_at.is_none() && self.finished_at.is_none()
    }

    /// Build an update holding only the fields that differ from `original`.
    ///
    /// Returns `None` when the edit is a no-op.
    pub fn diff(
        original: &TableOccupation,
        table_id: i64,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        let update = Self {
            table_id: (table_id != original.table_id).then_some(table_id),
            started_at: (started_at != original.started_at).then_some(started_at),
            finished_at: (finished_at != original.finished_at).then_some(finished_at),
        };
        (!update.is_empty()).then_some(update)
    }

    /// Apply this update to a local copy of the record.
    pub fn apply_to(&self, occupation: &mut TableOccupation) {
        if let Some(table_id) = self.table_id {
            occupation.table_id = table_id;
        }
        if let Some(started_at) = self.started_at {
            occupation.started_at = started_at;
        }
        if let Some(finished_at) = self.finished_at {
            occupation.finished_at = finished_at;
        }
    }
}
