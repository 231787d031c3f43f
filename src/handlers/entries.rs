use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::models::entry::{CreateEntryRequest, Entry, UpdateEntryRequest};
use crate::AppState;

pub async fn list_entries(State(state): State<AppState>) -> AppResult<Json<Vec<Entry>>> {
    let entries = state.entries.list().await?;
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Entry>> {
    let entry = state
        .entries
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entry not found with id: {}", id)))?;

    Ok(Json(entry))
}

pub async fn create_entry(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<Entry>)> {
    body.validate()?;

    let date = body.date;
    let entry = state
        .entries
        .insert(date, body.score, body.note)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Entry already exists for date: {}", date)))?;

    tracing::info!(entry_id = entry.id, date = %entry.date, "Entry created");

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateEntryRequest>,
) -> AppResult<Json<Entry>> {
    if state.entries.find(id).await?.is_none() {
        return Err(AppError::entry_not_found(id));
    }

    body.validate()?;

    let entry = state
        .entries
        .update(id, body.score, body.note)
        .await?
        .ok_or_else(|| AppError::entry_not_found(id))?;

    tracing::info!(entry_id = entry.id, "Entry updated");

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    if !state.entries.delete(id).await? {
        return Err(AppError::entry_not_found(id));
    }

    tracing::info!(entry_id = id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
