//! Billiard Table Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Table manufacturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableBrand {
    Mrsung,
    Xingjue,
    Diamond,
}

impl TableBrand {
    pub const ALL: [TableBrand; 3] = [TableBrand::Mrsung, TableBrand::Xingjue, TableBrand::Diamond];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mrsung => "mrsung",
            Self::Xingjue => "xingjue",
            Self::Diamond => "diamond",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mrsung => "MRSUNG",
            Self::Xingjue => "Xingjue",
            Self::Diamond => "Diamond",
        }
    }
}

impl fmt::Display for TableBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TableBrand {
    type Err = String;

    /// Accepts the wire value or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(needle) || b.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                format!(
                    "unknown table brand '{}' (expected one of: mrsung, xingjue, diamond)",
                    s
                )
            })
    }
}

/// Derived occupancy status of a table
///
/// Never sent by the backend; annotated client-side from the resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billiard table entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: i64,
    /// Display number, unique per hall (enforced by the backend)
    pub number: i32,
    pub brand: TableBrand,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub status: TableStatus,
}

impl Table {
    pub fn is_occupied(&self) -> bool {
        self.status == TableStatus::Occupied
    }
}

/// Create table payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCreate {
    pub number: i32,
    pub brand: TableBrand,
}

/// Update table payload (one entry of a batch update)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableUpdate {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<TableBrand>,
}

impl TableUpdate {
    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.brand.is_none()
    }
}
