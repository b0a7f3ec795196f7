//! Gift record handlers.
//!
//! Thin glue between HTTP and `RecordRepository`. Status codes come from
//! `AppError`; these handlers only decide between "found" and "not found".

use axum::{
    extract::{rejection::QueryRejection, Path, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use giftthanks_core::record::{thanked_from_json, FieldValue, GiftRecord};

use crate::{
    handlers::error::{AppError, HttpError},
    models::{read_payload, DataQuery},
    state::AppState,
};

/// Parses a record id from a path segment or query value.
///
/// Anything that is not a positive integer cannot name a record, so it is
/// reported as not found.
fn parse_record_id(raw: &str) -> Result<u64, HttpError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| HttpError::record_not_found(raw))
}

async fn find_record(state: &AppState, raw_id: &str) -> Result<GiftRecord, AppError> {
    let id = parse_record_id(raw_id)?;
    state
        .repo
        .find(id)
        .await?
        .ok_or_else(|| HttpError::record_not_found(raw_id).into())
}

// ============================================================================
// List / Query
// ============================================================================

/// List or search records (GET /data).
///
/// Honors at most one of `data_id`, `gift`, `gifter`, `thanked`, in that
/// order. `data_id` returns a single record; the others return an array.
pub async fn list_data(
    State(state): State<AppState>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;

    if let Some(data_id) = query.data_id.as_deref() {
        let record = find_record(&state, data_id).await?;
        return Ok(Json(record).into_response());
    }

    let records = match query.filter() {
        Some((field, value)) => state.repo.find_by(field, &FieldValue::from(value)).await?,
        None => state.repo.find_all().await?,
    };

    Ok(Json(records).into_response())
}

// ============================================================================
// Get
// ============================================================================

/// Get a single record by ID (GET /data/{id}).
pub async fn get_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GiftRecord>, AppError> {
    find_record(&state, &id).await.map(Json)
}

// ============================================================================
// Create
// ============================================================================

/// Create a record (POST /data).
///
/// Accepts a form post or a JSON body carrying `gift`, `gifter` and
/// `thanked`. Responds 201 with the stored record and its location.
pub async fn create_data(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, AppError> {
    let payload = read_payload(request).await?;
    let record = GiftRecord::from_json(&payload)?;

    let record = state.repo.save(record).await?;

    tracing::info!(id = record.id, "Created new record");

    let location = format!("/data/{}", record.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(record)))
}

// ============================================================================
// Update
// ============================================================================

/// Set whether a gift has been thanked (PATCH /data/{id}).
///
/// The body must carry `thanked`; `null` (or an empty form value) clears it.
pub async fn update_thanked(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<GiftRecord>, AppError> {
    let record_id = parse_record_id(&id)?;
    let payload = read_payload(request).await?;
    let thanked = thanked_from_json(&payload)?;

    let record = state
        .repo
        .mark_thanked(record_id, thanked)
        .await?
        .ok_or_else(|| HttpError::record_not_found(&id))?;

    tracing::info!(id = record.id, thanked = ?record.thanked, "Updated record");

    Ok(Json(record))
}

// ============================================================================
// Delete
// ============================================================================

/// Delete a record by ID (DELETE /data/{id}).
///
/// Always 204, whether or not the record existed.
pub async fn delete_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let record_id = parse_record_id(&id)?;

    state.repo.delete(record_id).await?;

    tracing::info!(id = record_id, "Deleted record");

    Ok(StatusCode::NO_CONTENT)
}
