//! Harvest submission and history HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{HarvestEvent, HarvestRecord, PageRequest, DEFAULT_PAGE_SIZE};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Body returned for an accepted harvest
#[derive(Debug, Serialize)]
pub struct SubmitHarvestResponse {
    pub message: &'static str,
    pub harvest: HarvestRecord,
    pub audit_logged: bool,
}

/// Optional pagination for the history endpoint
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl HistoryQuery {
    /// No parameters means the full history
    pub fn page_request(&self) -> Result<Option<PageRequest>, &'static str> {
        if self.page.is_none() && self.page_size.is_none() {
            return Ok(None);
        }
        PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map(Some)
    }
}

/// Record a new harvest event
pub async fn submit_harvest(
    State(state): State<AppState>,
    payload: Result<Json<HarvestEvent>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(event) = payload.map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;

    let receipt = state.pipeline.submit(event).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitHarvestResponse {
            message: "Harvest created successfully",
            harvest: receipt.record,
            audit_logged: receipt.audit_logged,
        }),
    ))
}

/// List harvest records, newest first
pub async fn list_harvests(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<Vec<HarvestRecord>>> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidQuery(rejection.body_text()))?;
    let page = query
        .page_request()
        .map_err(|msg| AppError::InvalidQuery(msg.to_string()))?;

    let records = state.pipeline.list_all(page).await?;
    Ok(Json(records))
}
