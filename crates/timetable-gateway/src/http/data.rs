//! Paginated listing endpoint: GET /api/data
//!
//! Query: `start_date`, `end_date`, `event_type`, `teacher`, `building`
//! (`all` or empty = no filter), `page` (default 1), `per_page` (default
//! 10, max 100), DataTables ordering (`order[0][column]`, `order[0][dir]`,
//! `columns[N][data]`).
//!
//! Response: `{ "data": [...], "total": 25, "page": 1, "per_page": 10 }`
//! Error:    422 `{ "error": "...", "code": "INVALID_PARAMETER" }`

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use timetable_core::TimetableError;
use timetable_table::{query, QueryParams, RecordView, Table};
use tracing::warn;

use super::error::{error_response, ApiError};
use super::json_body;
use super::params::RequestParams;
use crate::app::AppState;

pub const ENDPOINT: &str = "/api/data";

#[derive(Serialize)]
pub struct DataResponse<'a> {
    pub data: Vec<RecordView<'a>>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// GET /api/data: filtered, sorted, paginated records.
pub async fn data_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = RequestParams::from_pairs(pairs);
    let listing = params.to_query().map_err(|e| {
        warn!(error = %e, "rejected /api/data parameters");
        error_response(e.into())
    })?;

    let body = state
        .cache
        .get_or_compute(&params.cache_key(ENDPOINT), || {
            render_page(&state.table, &listing)
        })
        .map_err(error_response)?;
    Ok(json_body(body))
}

/// Run the query and serialize the page.
pub fn render_page(table: &Table, listing: &QueryParams) -> Result<Bytes, TimetableError> {
    let page = query(table, listing)?;
    let response = DataResponse {
        data: page.records.iter().map(|r| table.view(r)).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    };
    Ok(Bytes::from(serde_json::to_vec(&response)?))
}
