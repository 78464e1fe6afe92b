//! List envelopes as the backend sends them
//!
//! Each listing names its item array differently (`tables`,
//! `table_occupations`); both are normalized into [`PaginatedResponse`]
//! here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::models::{Table, TableOccupation};
use crate::query::PaginatedResponse;

/// `GET /v1/tables` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePage {
    pub page: u32,
    pub limit: u32,
    pub count: u64,
    pub total_pages: u32,
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// `GET /v1/table-occupations` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOccupationPage {
    pub page: u32,
    pub limit: u32,
    pub count: u64,
    pub total_pages: u32,
    #[serde(default)]
    pub table_occupations: Vec<TableOccupation>,
}

/// `PUT /v1/tables` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBatchUpdate<T> {
    pub tables: Vec<T>,
}

/// `PUT /v1/tables` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBatchUpdated {
    #[serde(default)]
    pub updated_tables: Vec<Table>,
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl From<TablePage> for PaginatedResponse<Table> {
    fn from(page: TablePage) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            count: page.count,
            total_pages: page.total_pages,
            items: page.tables,
        }
    }
}

impl From<TableOccupationPage> for PaginatedResponse<TableOccupation> {
    fn from(page: TableOccupationPage) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            count: page.count,
            total_pages: page.total_pages,
            items: page.table_occupations,
        }
    }
}

impl From<PaginatedResponse<TableOccupation>> for TableOccupationPage {
    fn from(resp: PaginatedResponse<TableOccupation>) -> Self {
        Self {
            page: resp.page,
            limit: resp.limit,
            count: resp.count,
            total_pages: resp.total_pages,
            table_occupations: resp.items,
        }
    }
}

impl From<PaginatedResponse<Table>> for TablePage {
    fn from(resp: PaginatedResponse<Table>) -> Self {
        Self {
            page: resp.page,
            limit: resp.limit,
            count: resp.count,
            total_pages: resp.total_pages,
            tables: resp.items,
        }
    }
}
