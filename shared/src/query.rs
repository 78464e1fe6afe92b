//! Query contract for paginated listings
//!
//! Requests encode to the backend's query string (`page`, `limit`,
//! `sort=<column>:<direction>`, `table_id`); responses are normalized into
//! [`PaginatedResponse`].
//!
//! Ordering contract: with `sort=started_at:desc` the first item of page 1
//! is the record with the greatest `started_at` among those matching the
//! filter. The active-occupation lookup depends on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// First page (pages are 1-based)
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size of list screens
pub const DEFAULT_LIMIT: u32 = 10;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Sortable occupation columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupationSortColumn {
    Id,
    TableId,
    StartedAt,
    FinishedAt,
    CreatedAt,
    UpdatedAt,
}

impl OccupationSortColumn {
    pub const ALL: [OccupationSortColumn; 6] = [
        Self::Id,
        Self::TableId,
        Self::StartedAt,
        Self::FinishedAt,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Column name as the backend expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::TableId => "table_id",
            Self::StartedAt => "started_at",
            Self::FinishedAt => "finished_at",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl fmt::Display for OccupationSortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OccupationSortColumn {
    type Err = String;

    /// Accepts snake_case (`started_at`) and camelCase (`startedAt`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().replace('_', "") == normalized)
            .ok_or_else(|| format!("unknown sort column '{}'", s))
    }
}

/// Sort column and direction for occupation listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationSort {
    pub column: OccupationSortColumn,
    pub direction: SortDirection,
}

impl OccupationSort {
    pub fn new(column: OccupationSortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// `<column>:<direction>` as sent in the `sort` query parameter
    pub fn to_query_value(&self) -> String {
        format!("{}:{}", self.column, self.direction)
    }
}

/// Page cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl Pagination {
    /// Zero values are raised to 1; both must be positive on the wire.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Occupation filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
}

impl OccupationFilter {
    pub fn table(table_id: i64) -> Self {
        Self {
            table_id: Some(table_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table_id.is_none()
    }
}

/// Paginated, sortable, filterable occupation query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OccupationQueryRequest {
    pub pagination: Pagination,
    #[serde(default)]
    pub filter: OccupationFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<OccupationSort>,
}

impl OccupationQueryRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            pagination: Pagination::new(page, limit),
            filter: OccupationFilter::default(),
            sort: None,
        }
    }

    /// The single most recently started occupation of a table:
    /// page 1, limit 1, `table_id` filter, `started_at:desc`.
    pub fn latest_for_table(table_id: i64) -> Self {
        Self::new(1, 1)
            .for_table(table_id)
            .order_by(OccupationSortColumn::StartedAt, SortDirection::Desc)
    }

    pub fn for_table(mut self, table_id: i64) -> Self {
        self.filter.table_id = Some(table_id);
        self
    }

    pub fn order_by(mut self, column: OccupationSortColumn, direction: SortDirection) -> Self {
        self.sort = Some(OccupationSort::new(column, direction));
        self
    }

    /// Query string pairs in a stable order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.pagination.to_query_pairs();
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.to_query_value()));
        }
        if let Some(table_id) = self.filter.table_id {
            pairs.push(("table_id", table_id.to_string()));
        }
        pairs
    }
}

/// Paginated response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Current page (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total matching records
    pub count: u64,
    /// `ceil(count / limit)`
    pub total_pages: u32,
    /// Items of this page, in the requested order
    pub items: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, count: u64, page: u32, limit: u32) -> Self {
        Self {
            total_pages: total_pages(count, limit),
            page,
            limit,
            count,
            items,
        }
    }

    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(Vec::new(), 0, page, limit)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    /// First item, consuming the page
    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }
}

/// `ceil(count / limit)`; 0 when `limit` is 0.
pub fn total_pages(count: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    count.div_ceil(limit as u64).min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_for_table_request() {
        let req = OccupationQueryRequest::latest_for_table(42);
        assert_eq!(
            req.to_query_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "1".to_string()),
                ("sort", "started_at:desc".to_string()),
                ("table_id", "42".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_without_sort_or_filter() {
        let req = OccupationQueryRequest::new(3, 20);
        assert_eq!(
            req.to_query_pairs(),
            vec![("page", "3".to_string()), ("limit", "20".to_string())]
        );
    }

    #[test]
    fn test_pagination_rejects_zero() {
        let p = Pagination::new(0, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn test_sort_column_parsing() {
        assert_eq!(
            "startedAt".parse::<OccupationSortColumn>().unwrap(),
            OccupationSortColumn::StartedAt
        );
        assert_eq!(
            "finished_at".parse::<OccupationSortColumn>().unwrap(),
            OccupationSortColumn::FinishedAt
        );
        assert_eq!(
            "TableId".parse::<OccupationSortColumn>().unwrap(),
            OccupationSortColumn::TableId
        );
        assert!("duration".parse::<OccupationSortColumn>().is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);

        let resp = PaginatedResponse::new(vec!["a", "b"], 42, 2, 20);
        assert_eq!(resp.total_pages, 3);
        assert!(resp.has_next_page());
    }
}
