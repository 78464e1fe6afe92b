//! Client-side list state
//!
//! Page cursor, page size, sort column/direction and filter of a list
//! screen, plus the small rules the screens apply when they change.
//! Interactive front-ends keep one of these per screen; one-shot commands
//! only build the request from it.

use crate::query::{
    DEFAULT_LIMIT, DEFAULT_PAGE, OccupationFilter, OccupationQueryRequest, OccupationSort,
    OccupationSortColumn, PaginatedResponse, Pagination, SortDirection,
};

/// Page sizes offered by list screens
pub const LIMIT_OPTIONS: [u32; 4] = [5, 10, 20, 50];

/// What the screen should do after deleting a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterDelete {
    /// The page emptied; the cursor already moved back one page
    StepBack,
    /// Re-fetch the current page
    Reload,
}

/// Pagination state of a list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListState {
    pub page: u32,
    pub limit: u32,
    pub count: u64,
    pub total_pages: u32,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            count: 0,
            total_pages: 1,
        }
    }
}

impl ListState {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    /// Copy totals from a fetched page.
    pub fn apply<T>(&mut self, response: &PaginatedResponse<T>) {
        self.count = response.count;
        self.total_pages = response.total_pages;
    }

    /// Changing the page size restarts from the first page.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.page = DEFAULT_PAGE;
    }

    /// Move to `page`, clamped to `1..=total_pages`.
    pub fn go_to(&mut self, page: u32) {
        let last = self.total_pages.max(1);
        self.page = page.clamp(1, last);
    }

    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Deleting the only row of a page past the first steps back one page.
    pub fn after_delete(&mut self, rows_on_page: usize) -> AfterDelete {
        if rows_on_page == 1 && self.page > 1 {
            self.page -= 1;
            AfterDelete::StepBack
        } else {
            AfterDelete::Reload
        }
    }

    /// `(from, to, count)` as in "Showing 11 to 20 of 42 entries".
    /// A page past the end shows `(0, 0, count)`.
    pub fn showing_range(&self) -> (u64, u64, u64) {
        let page = u64::from(self.page.max(1));
        let limit = u64::from(self.limit.max(1));
        let from = (page - 1).saturating_mul(limit).saturating_add(1);
        if from > self.count {
            return (0, 0, self.count);
        }
        let to = page.saturating_mul(limit).min(self.count);
        (from, to, self.count)
    }
}

/// State of an occupation list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupationListState {
    pub list: ListState,
    pub sort: Option<OccupationSort>,
    pub filter: OccupationFilter,
}

impl Default for OccupationListState {
    /// Newest first by creation time
    fn default() -> Self {
        Self {
            list: ListState::default(),
            sort: Some(OccupationSort::new(
                OccupationSortColumn::CreatedAt,
                SortDirection::Desc,
            )),
            filter: OccupationFilter::default(),
        }
    }
}

impl OccupationListState {
    /// Occupation history of one table, latest start first
    pub fn for_table(table_id: i64) -> Self {
        Self {
            list: ListState::default(),
            sort: Some(OccupationSort::new(
                OccupationSortColumn::StartedAt,
                SortDirection::Desc,
            )),
            filter: OccupationFilter::table(table_id),
        }
    }

    /// Clicking the active column flips direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, column: OccupationSortColumn) {
        self.sort = Some(match self.sort {
            Some(current) if current.column == column => {
                OccupationSort::new(column, current.direction.toggled())
            }
            _ => OccupationSort::new(column, SortDirection::Asc),
        });
    }

    /// Changing the filter restarts from the first page.
    pub fn set_filter(&mut self, filter: OccupationFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.list.page = DEFAULT_PAGE;
        }
    }

    pub fn request(&self) -> OccupationQueryRequest {
        OccupationQueryRequest {
            pagination: self.list.pagination(),
            filter: self.filter,
            sort: self.sort,
        }
    }
}
