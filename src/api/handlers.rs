use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{RequestId, WriteCapability},
    models::{MovieCandidate, WatchRecord},
    services::{
        calendar::{index_by_day, CalendarCursor, MonthView},
        movies::{self, CreateWatchRequest, EditWatchRequest},
        timeline::group_by_date,
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    /// 0-based
    pub month: Option<u32>,
    /// Day to select for the detail list
    pub day: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<MovieCandidate>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Every logged watch, newest first
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<WatchRecord>>> {
    let records = movies::list_watches(state.store.as_ref()).await?;
    Ok(Json(records))
}

/// Year → month → day timeline
pub async fn timeline(State(state): State<AppState>) -> AppResult<Response> {
    let records = state.store.list().await?;
    let groups = group_by_date(&records);

    tracing::debug!(records = records.len(), years = groups.len(), "Serving timeline");

    // Groups borrow the records, so serialize before they go out of scope
    Ok(Json(groups).into_response())
}

/// Month grid with the records of each day and an optional selected day
pub async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Response> {
    let mut cursor = match (query.year, query.month) {
        (Some(year), Some(month)) => CalendarCursor::new(year, month)?,
        (None, None) => CalendarCursor::containing(&Utc::now()),
        _ => {
            return Err(AppError::InvalidInput(
                "year and month must be given together".to_string(),
            ))
        }
    };

    let records = state.store.list().await?;
    let index = index_by_day(&records, cursor.year(), cursor.month());
    if let Some(day) = query.day {
        cursor.select_day(day, &index);
    }

    let view = MonthView::new(&cursor, index)?;
    Ok(Json(view).into_response())
}

/// Metadata candidates for the add dialog
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let results = state.metadata.search(&params.q).await?;
    Ok(Json(SearchResponse { results }))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    capability: WriteCapability,
    Json(request): Json<CreateWatchRequest>,
) -> AppResult<(StatusCode, Json<WatchRecord>)> {
    tracing::info!(request_id = %request_id, title = %request.title, "Creating watch record");

    let record = movies::create_watch(
        &capability,
        state.store.as_ref(),
        state.metadata.as_ref(),
        request,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn edit_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    capability: WriteCapability,
    Json(request): Json<EditWatchRequest>,
) -> AppResult<Json<WatchRecord>> {
    tracing::info!(request_id = %request_id, id = %id, "Editing watch record");

    let record = movies::edit_watch(&capability, state.store.as_ref(), id, request).await?;
    Ok(Json(record))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    capability: WriteCapability,
) -> AppResult<StatusCode> {
    tracing::info!(request_id = %request_id, id = %id, "Deleting watch record");

    movies::delete_watch(&capability, state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
