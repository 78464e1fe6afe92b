//! Shared types for Cue
//!
//! Domain model, query contract and pure occupancy logic used by both the
//! HTTP client and the console front-end. Nothing in here performs I/O.

pub mod error;
pub mod listing;
pub mod models;
pub mod occupancy;
pub mod query;
pub mod util;
pub mod validation;
pub mod wire;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::ValidationError;
pub use listing::{AfterDelete, ListState, OccupationListState};
pub use models::*;
pub use occupancy::{Occupancy, format_duration};
pub use query::{
    OccupationFilter, OccupationQueryRequest, OccupationSort, OccupationSortColumn,
    PaginatedResponse, Pagination, SortDirection,
};
