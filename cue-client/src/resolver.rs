//! Active-occupation resolver
//!
//! Fetches the most recently started occupation of a table and keeps
//! "no occupation" apart from "could not find out". A transport or server
//! failure never reaches the caller as an error: it becomes
//! [`Resolution::Unavailable`], which shows the table as available.

use chrono::{DateTime, Utc};
use shared::validation::warn_if_inverted;
use shared::{OccupationQueryRequest, Occupancy, Table, TableOccupation, TableStatus};

use crate::query::OccupationQuery;

/// Outcome of one lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The query succeeded; `None` when the table has no usable record
    Known(Option<TableOccupation>),
    /// The backend could not be asked
    Unavailable { reason: String },
}

impl Resolution {
    pub fn occupation(&self) -> Option<&TableOccupation> {
        match self {
            Self::Known(occupation) => occupation.as_ref(),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Classification at `now`; `None` while unavailable.
    pub fn occupancy(&self, now: DateTime<Utc>) -> Option<Occupancy> {
        match self {
            Self::Known(occupation) => Some(Occupancy::classify(occupation.as_ref(), now)),
            Self::Unavailable { .. } => None,
        }
    }

    /// Unavailable fails open to [`TableStatus::Available`].
    pub fn table_status(&self, now: DateTime<Utc>) -> TableStatus {
        self.occupancy(now)
            .map(|o| o.table_status())
            .unwrap_or(TableStatus::Available)
    }

    pub fn apply_to(&self, table: &mut Table, now: DateTime<Utc>) {
        table.status = self.table_status(now);
    }
}

/// Looks up the latest occupation of a table through an [`OccupationQuery`]
#[derive(Debug, Clone)]
pub struct ActiveOccupationResolver<Q> {
    query: Q,
}

impl<Q: OccupationQuery> ActiveOccupationResolver<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// One page-1, limit-1, `started_at:desc` query for `table_id`.
    ///
    /// Only the latest-started record is inspected; an older occupation
    /// still running underneath a newer upcoming one is not seen.
    pub async fn resolve(&self, table_id: i64) -> Resolution {
        let request = OccupationQueryRequest::latest_for_table(table_id);
        match self.query.query_occupations(&request).await {
            Ok(page) => {
                let latest = page.into_first().filter(|occupation| {
                    if occupation.table_id != table_id {
                        tracing::warn!(
                            table_id,
                            returned_table_id = occupation.table_id,
                            occupation_id = occupation.id,
                            "Ignoring occupation of another table"
                        );
                        return false;
                    }
                    true
                });
                if let Some(occupation) = &latest {
                    warn_if_inverted(occupation);
                }
                Resolution::Known(latest)
            }
            Err(e) if e.is_malformed() => {
                tracing::warn!(table_id, error = %e, "Malformed occupation payload, treating as none");
                Resolution::Known(None)
            }
            Err(e) => {
                tracing::error!(table_id, error = %e, "Occupation lookup failed");
                Resolution::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Resolve and annotate `table.status` in one go.
    pub async fn refresh_table(&self, table: &mut Table, now: DateTime<Utc>) -> Resolution {
        let resolution = self.resolve(table.id).await;
        resolution.apply_to(table, now);
        resolution
    }
}
