//! `/v1/table-occupations`

use shared::validation::{interval_warning, validate_occupation_create};
use shared::wire::TableOccupationPage;
use shared::{
    OccupationQueryRequest, PaginatedResponse, TableOccupation, TableOccupationCreate,
    TableOccupationUpdate,
};

use crate::{ClientError, ClientResult, HttpClient};

pub const TABLE_OCCUPATIONS_PATH: &str = "v1/table-occupations";

impl HttpClient {
    // ========== Table Occupations API ==========

    /// One page of occupations, filtered and sorted as requested
    pub async fn list_table_occupations(
        &self,
        request: &OccupationQueryRequest,
    ) -> ClientResult<PaginatedResponse<TableOccupation>> {
        let page: TableOccupationPage = self
            .get(TABLE_OCCUPATIONS_PATH, &request.to_query_pairs())
            .await?;
        Ok(page.into())
    }

    pub async fn get_table_occupation(&self, id: i64) -> ClientResult<TableOccupation> {
        self.get(&format!("{TABLE_OCCUPATIONS_PATH}/{id}"), &[]).await
    }

    /// Create an occupation. An end at or before the start is sent anyway.
    pub async fn create_table_occupation(
        &self,
        payload: &TableOccupationCreate,
    ) -> ClientResult<TableOccupation> {
        validate_occupation_create(payload)?;
        if let Some(warning) = interval_warning(payload.started_at, payload.finished_at) {
            tracing::warn!(table_id = payload.table_id, "{}", warning);
        }
        let occupation: TableOccupation = self.post(TABLE_OCCUPATIONS_PATH, payload).await?;
        tracing::info!(
            occupation_id = occupation.id,
            table_id = occupation.table_id,
            "Table occupation created"
        );
        Ok(occupation)
    }

    /// Partial update; only the fields present in `patch` are sent.
    pub async fn update_table_occupation(
        &self,
        id: i64,
        patch: &TableOccupationUpdate,
    ) -> ClientResult<TableOccupation> {
        if patch.is_empty() {
            return Err(ClientError::Validation("table_occupation: nothing to update".into()));
        }
        let occupation: TableOccupation = self
            .put(&format!("{TABLE_OCCUPATIONS_PATH}/{id}"), patch)
            .await?;
        tracing::info!(occupation_id = id, "Table occupation updated");
        Ok(occupation)
    }

    /// Delete an occupation; returns the deleted record.
    pub async fn delete_table_occupation(&self, id: i64) -> ClientResult<TableOccupation> {
        let occupation: TableOccupation = self
            .delete(&format!("{TABLE_OCCUPATIONS_PATH}/{id}"))
            .await?;
        tracing::info!(occupation_id = id, "Table occupation deleted");
        Ok(occupation)
    }
}
