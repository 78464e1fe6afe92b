//! Occupation query seam
//!
//! The resolver and the watcher only need "run this occupation query";
//! [`HttpClient`] answers it over the network, [`InMemoryOccupations`]
//! answers it from a local list.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use shared::query::{OccupationSortColumn, Pagination, SortDirection};
use shared::{OccupationQueryRequest, PaginatedResponse, TableOccupation};
use tokio::sync::RwLock;

use crate::{ClientResult, HttpClient};

/// Paginated occupation lookup
///
/// Implementations must honor the ordering contract: with
/// `sort = started_at:desc` the first item of page 1 has the greatest
/// `started_at` among the records matching the filter.
#[async_trait]
pub trait OccupationQuery: Send + Sync {
    async fn query_occupations(
        &self,
        request: &OccupationQueryRequest,
    ) -> ClientResult<PaginatedResponse<TableOccupation>>;
}

#[async_trait]
impl OccupationQuery for HttpClient {
    async fn query_occupations(
        &self,
        request: &OccupationQueryRequest,
    ) -> ClientResult<PaginatedResponse<TableOccupation>> {
        self.list_table_occupations(request).await
    }
}

#[async_trait]
impl<Q: OccupationQuery + ?Sized> OccupationQuery for Arc<Q> {
    async fn query_occupations(
        &self,
        request: &OccupationQueryRequest,
    ) -> ClientResult<PaginatedResponse<TableOccupation>> {
        (**self).query_occupations(request).await
    }
}

/// Occupations held in memory, queried with the backend's semantics
#[derive(Debug, Default)]
pub struct InMemoryOccupations {
    records: RwLock<Vec<TableOccupation>>,
}

impl InMemoryOccupations {
    pub fn new(records: Vec<TableOccupation>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn insert(&self, occupation: TableOccupation) {
        self.records.write().await.push(occupation);
    }

    /// Replace every record
    pub async fn replace(&self, records: Vec<TableOccupation>) {
        *self.records.write().await = records;
    }

    pub async fn remove(&self, id: i64) -> Option<TableOccupation> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|o| o.id == id)?;
        Some(records.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OccupationQuery for InMemoryOccupations {
    async fn query_occupations(
        &self,
        request: &OccupationQueryRequest,
    ) -> ClientResult<PaginatedResponse<TableOccupation>> {
        let mut matching: Vec<TableOccupation> = self
            .records
            .read()
            .await
            .iter()
            .filter(|o| request.filter.table_id.is_none_or(|id| o.table_id == id))
            .cloned()
            .collect();

        if let Some(sort) = request.sort {
            matching.sort_by(|a, b| {
                let ord = compare_by(sort.column, a, b);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let count = matching.len() as u64;
        let Pagination { page, limit } = request.pagination;
        let offset = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();
        Ok(PaginatedResponse::new(items, count, page, limit))
    }
}

fn compare_by(column: OccupationSortColumn, a: &TableOccupation, b: &TableOccupation) -> Ordering {
    match column {
        OccupationSortColumn::Id => a.id.cmp(&b.id),
        OccupationSortColumn::TableId => a.table_id.cmp(&b.table_id),
        OccupationSortColumn::StartedAt => a.started_at.cmp(&b.started_at),
        OccupationSortColumn::FinishedAt => a.finished_at.cmp(&b.finished_at),
        OccupationSortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        OccupationSortColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}
