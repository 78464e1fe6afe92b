//! Input validation helpers
//!
//! Checks the front-ends run before sending a payload. Uniqueness of table
//! numbers and overlap between occupations are the backend's business.

use chrono::{DateTime, Duration, Utc};

use crate::error::ValidationError;
use crate::models::{TableCreate, TableOccupation, TableOccupationCreate, TableUpdate};

/// A new occupation must start at least this far in the future
pub const MIN_START_LEAD_SECS: i64 = 60;

/// Replacement start offered when the requested one is too soon
pub const SUGGESTED_START_DELAY_SECS: i64 = 10;

/// Outcome of [`check_start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCheck {
    Ok,
    /// Earlier than `now + MIN_START_LEAD_SECS`; the caller may confirm
    /// `suggested` instead or ask for another value.
    TooSoon { suggested: DateTime<Utc> },
}

pub fn validate_table_number(number: i32) -> Result<(), ValidationError> {
    if number < 1 {
        return Err(ValidationError::new(
            "number",
            format!("table number must be at least 1 (got {number})"),
        ));
    }
    Ok(())
}

pub fn validate_table_create(payload: &TableCreate) -> Result<(), ValidationError> {
    validate_table_number(payload.number)
}

pub fn validate_table_update(payload: &TableUpdate) -> Result<(), ValidationError> {
    if payload.is_empty() {
        return Err(ValidationError::new("tables", "nothing to update"));
    }
    if let Some(number) = payload.number {
        validate_table_number(number)?;
    }
    Ok(())
}

pub fn validate_occupation_create(payload: &TableOccupationCreate) -> Result<(), ValidationError> {
    if payload.table_id <= 0 {
        return Err(ValidationError::new("table_id", "table is required"));
    }
    Ok(())
}

/// Lead-time rule of the create dialog.
pub fn check_start(started_at: DateTime<Utc>, now: DateTime<Utc>) -> StartCheck {
    if started_at < now + Duration::seconds(MIN_START_LEAD_SECS) {
        StartCheck::TooSoon {
            suggested: now + Duration::seconds(SUGGESTED_START_DELAY_SECS),
        }
    } else {
        StartCheck::Ok
    }
}

/// Warning for an end at or before the start. Never an error.
pub fn interval_warning(
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
) -> Option<String> {
    match finished_at {
        Some(finished_at) if finished_at <= started_at => Some(format!(
            "finished_at ({}) is not after started_at ({})",
            finished_at.to_rfc3339(),
            started_at.to_rfc3339()
        )),
        _ => None,
    }
}

/// Log [`interval_warning`] for a stored record, if any.
pub fn warn_if_inverted(occupation: &TableOccupation) {
    if let Some(warning) = interval_warning(occupation.started_at, occupation.finished_at) {
        tracing::warn!(occupation_id = occupation.id, table_id = occupation.table_id, "{}", warning);
    }
}
