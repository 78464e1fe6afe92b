//! Active-occupation classification
//!
//! Decides, for the most recently started occupation of a table and an
//! explicit instant `now`, whether the table is occupied right now and what
//! the countdown shows. Pure and idempotent: same inputs, same result.
//!
//! Resolution order:
//! 1. no record                         -> [`Occupancy::NoOccupation`]
//! 2. `now < started_at`                -> [`Occupancy::Upcoming`] (time until start)
//! 3. no `finished_at`                  -> [`Occupancy::OpenEnded`] (elapsed since start)
//! 4. `finished_at > now`               -> [`Occupancy::Timed`] (time left)
//! 5. otherwise                         -> [`Occupancy::Expired`]

mod format;

pub use format::{format_delta, format_duration};

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Table, TableOccupation, TableStatus};

/// Label shown once a timed occupation has run out
pub const TIME_IS_UP: &str = "Time is up";

/// Label shown when the table has no occupation at all
pub const NO_ACTIVE_OCCUPATION: &str = "No active occupation";

/// Classification of a table's latest occupation at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Occupancy {
    /// The table has no occupation record
    NoOccupation,
    /// Starts in the future
    Upcoming {
        #[serde(with = "seconds")]
        starts_in: Duration,
    },
    /// Started, no known end ("open table"); grows without bound
    OpenEnded {
        #[serde(with = "seconds")]
        elapsed: Duration,
    },
    /// Started, ends in the future; shrinks toward zero
    Timed {
        #[serde(with = "seconds")]
        remaining: Duration,
    },
    /// Timed occupation whose end has passed
    Expired,
}

impl Occupancy {
    /// Classify `occupation` at `now`.
    pub fn classify(occupation: Option<&TableOccupation>, now: DateTime<Utc>) -> Self {
        let Some(occupation) = occupation else {
            return Self::NoOccupation;
        };

        if now < occupation.started_at {
            return Self::Upcoming {
                starts_in: occupation.started_at - now,
            };
        }

        match occupation.finished_at {
            None => Self::OpenEnded {
                elapsed: now - occupation.started_at,
            },
            Some(finished_at) if finished_at > now => Self::Timed {
                remaining: finished_at - now,
            },
            Some(_) => Self::Expired,
        }
    }

    /// Open-ended and timed occupations hold the table.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::OpenEnded { .. } | Self::Timed { .. })
    }

    pub fn table_status(&self) -> TableStatus {
        if self.is_occupied() {
            TableStatus::Occupied
        } else {
            TableStatus::Available
        }
    }

    /// Annotate `table.status` from this classification.
    pub fn apply_to(&self, table: &mut Table) {
        table.status = self.table_status();
    }

    /// Countdown duration, if this state carries one
    pub fn duration(&self) -> Option<Duration> {
        match *self {
            Self::Upcoming { starts_in } => Some(starts_in),
            Self::OpenEnded { elapsed } => Some(elapsed),
            Self::Timed { remaining } => Some(remaining),
            Self::NoOccupation | Self::Expired => None,
        }
    }

    /// Countdown duration in whole seconds (truncated), never negative
    pub fn seconds(&self) -> Option<i64> {
        self.duration().map(|d| d.num_seconds().max(0))
    }

    /// Heading that goes with [`Occupancy::countdown`]
    pub fn caption(&self) -> &'static str {
        match self {
            Self::NoOccupation => "Status",
            Self::Upcoming { .. } => "Starts in",
            Self::OpenEnded { .. } => "Occupation time",
            Self::Timed { .. } | Self::Expired => "Time left",
        }
    }

    /// Human-readable countdown, e.g. `"5m 0s"` or `"Time is up"`
    pub fn countdown(&self) -> String {
        match self {
            Self::NoOccupation => NO_ACTIVE_OCCUPATION.to_string(),
            Self::Expired => TIME_IS_UP.to_string(),
            _ => format_duration(self.seconds().unwrap_or_default()),
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOccupation => f.write_str(NO_ACTIVE_OCCUPATION),
            Self::Expired => f.write_str(TIME_IS_UP),
            _ => write!(f, "{}: {}", self.caption(), self.countdown()),
        }
    }
}

mod seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        i64::deserialize(d).map(Duration::seconds)
    }
}
