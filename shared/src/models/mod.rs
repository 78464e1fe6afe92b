//! Data models
//!
//! Shared between the HTTP client and the console front-end.
//! Field names match the backend's snake_case wire format, so these types
//! are (de)serialized directly. All IDs are `i64`.

pub mod table;
pub mod table_occupation;

// Re-exports
pub use table::*;
pub use table_occupation::*;
