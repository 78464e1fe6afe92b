//! Backend endpoints
//!
//! Each submodule adds `impl HttpClient` methods for one resource.

mod occupations;
mod tables;

pub use occupations::TABLE_OCCUPATIONS_PATH;
pub use tables::{DEFAULT_FETCH_BATCH, TABLES_PATH};
