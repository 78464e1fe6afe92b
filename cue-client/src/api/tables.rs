//! `/v1/tables`

use shared::query::Pagination;
use shared::validation::{validate_table_create, validate_table_update};
use shared::wire::{TableBatchUpdate, TableBatchUpdated, TablePage};
use shared::{PaginatedResponse, Table, TableCreate, TableUpdate};

use crate::{ClientError, ClientResult, HttpClient};

pub const TABLES_PATH: &str = "v1/tables";

/// Page size used when walking every table
pub const DEFAULT_FETCH_BATCH: u32 = 25;

impl HttpClient {
    // ========== Tables API ==========

    /// One page of tables
    pub async fn list_tables(&self, pagination: Pagination) -> ClientResult<PaginatedResponse<Table>> {
        let page: TablePage = self.get(TABLES_PATH, &pagination.to_query_pairs()).await?;
        Ok(page.into())
    }

    /// Every table, fetched `batch` at a time until the last page.
    pub async fn list_all_tables(&self, batch: u32) -> ClientResult<Vec<Table>> {
        let mut pagination = Pagination::new(1, batch);
        let mut tables = Vec::new();
        loop {
            let page = self.list_tables(pagination).await?;
            let done = page.is_empty() || !page.has_next_page();
            tables.extend(page.items);
            if done {
                break;
            }
            pagination.page += 1;
        }
        tracing::debug!(count = tables.len(), "Fetched all tables");
        Ok(tables)
    }

    pub async fn get_table(&self, id: i64) -> ClientResult<Table> {
        self.get(&format!("{TABLES_PATH}/{id}"), &[]).await
    }

    pub async fn create_table(&self, payload: &TableCreate) -> ClientResult<Table> {
        validate_table_create(payload)?;
        let table: Table = self.post(TABLES_PATH, payload).await?;
        tracing::info!(table_id = table.id, number = table.number, brand = %table.brand, "Table created");
        Ok(table)
    }

    /// Batch update; returns the updated records.
    pub async fn update_tables(&self, updates: &[TableUpdate]) -> ClientResult<Vec<Table>> {
        if updates.is_empty() {
            return Err(ClientError::Validation("tables: nothing to update".into()));
        }
        for update in updates {
            validate_table_update(update)?;
        }
        let body = TableBatchUpdate {
            tables: updates.to_vec(),
        };
        let resp: TableBatchUpdated = self.put(TABLES_PATH, &body).await?;
        tracing::info!(count = resp.updated_tables.len(), "Tables updated");
        Ok(resp.updated_tables)
    }

    /// Delete a table; returns the deleted record.
    pub async fn delete_table(&self, id: i64) -> ClientResult<Table> {
        let table: Table = self.delete(&format!("{TABLES_PATH}/{id}")).await?;
        tracing::info!(table_id = id, "Table deleted");
        Ok(table)
    }
}
