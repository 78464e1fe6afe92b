//! In-process fake backend for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use cue_client::{ClientConfig, HttpClient, InMemoryOccupations, OccupationQuery};
use serde::Deserialize;
use shared::query::{OccupationSort, Pagination};
use shared::wire::{ErrorBody, TableBatchUpdate, TableBatchUpdated, TableOccupationPage, TablePage};
use shared::{
    OccupationFilter, OccupationQueryRequest, PaginatedResponse, Table, TableBrand, TableCreate,
    TableOccupation, TableOccupationCreate, TableOccupationUpdate, TableStatus, TableUpdate,
};
use tokio::sync::Mutex;

/// How the occupation listing answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OccupationMode {
    #[default]
    Normal,
    /// 500 with a JSON message
    ServerError,
    /// 200 with a body that is not an occupation page
    Malformed,
}

#[derive(Default)]
pub struct FakeState {
    pub tables: Mutex<Vec<Table>>,
    pub occupations: InMemoryOccupations,
    pub mode: Mutex<OccupationMode>,
    /// Artificial latency of the occupation listing, per filtered table
    pub delays: Mutex<HashMap<i64, Duration>>,
    next_id: AtomicI64,
}

impl FakeState {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn add_table(&self, number: i32, brand: TableBrand) -> Table {
        let now = Utc::now();
        let table = Table {
            id: self.next_id(),
            number,
            brand,
            created_at: now,
            updated_at: now,
            status: TableStatus::Available,
        };
        self.tables.lock().await.push(table.clone());
        table
    }

    pub async fn add_occupation(
        &self,
        table_id: i64,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
    ) -> TableOccupation {
        let now = Utc::now();
        let occupation = TableOccupation {
            id: self.next_id(),
            table_id,
            started_at,
            finished_at,
            created_at: now,
            updated_at: now,
        };
        self.occupations.insert(occupation.clone()).await;
        occupation
    }

    pub async fn set_mode(&self, mode: OccupationMode) {
        *self.mode.lock().await = mode;
    }

    pub async fn set_delay(&self, table_id: i64, delay: Duration) {
        self.delays.lock().await.insert(table_id, delay);
    }
}

pub struct FakeBackend {
    pub addr: SocketAddr,
    pub state: Arc<FakeState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url()).with_timeout(5)
    }

    pub fn client(&self) -> HttpClient {
        HttpClient::new(&self.config()).unwrap()
    }
}

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/v1/tables", get(list_tables).post(create_table).put(update_tables))
        .route("/v1/tables/{id}", get(get_table).delete(delete_table))
        .route(
            "/v1/table-occupations",
            get(list_occupations).post(create_occupation),
        )
        .route(
            "/v1/table-occupations/{id}",
            get(get_occupation)
                .put(update_occupation)
                .delete(delete_occupation),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
    sort: Option<String>,
    table_id: Option<i64>,
}

impl ListParams {
    fn pagination(&self) -> Pagination {
        Pagination::new(self.page.unwrap_or(1), self.limit.unwrap_or(10))
    }
}

// ===== Tables =====

async fn list_tables(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<TablePage> {
    let tables = state.tables.lock().await;
    let Pagination { page, limit } = params.pagination();
    let items: Vec<Table> = tables
        .iter()
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .cloned()
        .collect();
    Ok(Json(
        PaginatedResponse::new(items, tables.len() as u64, page, limit).into(),
    ))
}

async fn get_table(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> ApiResult<Table> {
    let tables = state.tables.lock().await;
    tables
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("Table {id} not found")))
}

async fn create_table(
    State(state): State<Arc<FakeState>>,
    Json(payload): Json<TableCreate>,
) -> ApiResult<Table> {
    if state
        .tables
        .lock()
        .await
        .iter()
        .any(|t| t.number == payload.number)
    {
        return Err(error(
            StatusCode::CONFLICT,
            format!("Table number {} already exists", payload.number),
        ));
    }
    Ok(Json(state.add_table(payload.number, payload.brand).await))
}

async fn update_tables(
    State(state): State<Arc<FakeState>>,
    Json(payload): Json<TableBatchUpdate<TableUpdate>>,
) -> ApiResult<TableBatchUpdated> {
    let mut tables = state.tables.lock().await;
    let mut updated_tables = Vec::new();
    for update in payload.tables {
        let table = tables
            .iter_mut()
            .find(|t| t.id == update.id)
            .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("Table {} not found", update.id)))?;
        if let Some(number) = update.number {
            table.number = number;
        }
        if let Some(brand) = update.brand {
            table.brand = brand;
        }
        table.updated_at = Utc::now();
        updated_tables.push(table.clone());
    }
    Ok(Json(TableBatchUpdated { updated_tables }))
}

async fn delete_table(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> ApiResult<Table> {
    let mut tables = state.tables.lock().await;
    let index = tables
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("Table {id} not found")))?;
    Ok(Json(tables.remove(index)))
}

// ===== Table occupations =====

async fn list_occupations(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(table_id) = params.table_id {
        let delay = state.delays.lock().await.get(&table_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    match *state.mode.lock().await {
        OccupationMode::Normal => {}
        OccupationMode::ServerError => {
            return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "database is down"));
        }
        OccupationMode::Malformed => {
            return Ok(Json(serde_json::json!({ "unexpected": true })));
        }
    }

    let sort = match params.sort.as_deref() {
        Some(raw) => Some(parse_sort(raw).ok_or_else(|| {
            error(StatusCode::BAD_REQUEST, format!("Invalid sort '{raw}'"))
        })?),
        None => None,
    };
    let request = OccupationQueryRequest {
        pagination: params.pagination(),
        filter: OccupationFilter {
            table_id: params.table_id,
        },
        sort,
    };
    let page = state
        .occupations
        .query_occupations(&request)
        .await
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let page: TableOccupationPage = page.into();
    Ok(Json(serde_json::to_value(page).unwrap()))
}

fn parse_sort(raw: &str) -> Option<OccupationSort> {
    let (column, direction) = raw.split_once(':')?;
    Some(OccupationSort::new(column.parse().ok()?, direction.parse().ok()?))
}

async fn find_occupation(state: &FakeState, id: i64) -> Result<TableOccupation, ApiError> {
    let request = OccupationQueryRequest::new(1, u32::MAX);
    let all = state.occupations.query_occupations(&request).await.unwrap();
    all.items
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("Table occupation {id} not found")))
}

async fn get_occupation(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
) -> ApiResult<TableOccupation> {
    find_occupation(&state, id).await.map(Json)
}

async fn create_occupation(
    State(state): State<Arc<FakeState>>,
    Json(payload): Json<TableOccupationCreate>,
) -> ApiResult<TableOccupation> {
    Ok(Json(
        state
            .add_occupation(payload.table_id, payload.started_at, payload.finished_at)
            .await,
    ))
}

async fn update_occupation(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
    Json(patch): Json<TableOccupationUpdate>,
) -> ApiResult<TableOccupation> {
    let mut occupation = find_occupation(&state, id).await?;
    patch.apply_to(&mut occupation);
    occupation.updated_at = Utc::now();
    state.occupations.remove(id).await;
    state.occupations.insert(occupation.clone()).await;
    Ok(Json(occupation))
}

async fn delete_occupation(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
) -> ApiResult<TableOccupation> {
    state
        .occupations
        .remove(id)
        .await
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("Table occupation {id} not found")))
}
