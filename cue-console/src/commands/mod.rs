//! Command implementations, one module per top-level command.

pub mod occupations;
pub mod tables;
pub mod watch;

use shared::listing::LIMIT_OPTIONS;

/// `value_parser` for `--limit`: one of the page sizes the list screens offer.
pub fn page_size(raw: &str) -> Result<u32, String> {
    let limit: u32 = raw.parse().map_err(|_| format!("invalid page size '{raw}'"))?;
    if LIMIT_OPTIONS.contains(&limit) {
        Ok(limit)
    } else {
        Err(format!("page size must be one of {LIMIT_OPTIONS:?}"))
    }
}
