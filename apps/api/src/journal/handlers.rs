use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::journal::entries::{fetch_history, record_entry};
use crate::models::entry::JournalEntry;
use crate::state::AppState;

pub const SAVE_FAILED_DETAIL: &str = "Failed to save entry to database.";
pub const HISTORY_FAILED_DETAIL: &str = "Failed to fetch history.";

#[derive(Debug, Deserialize, Validate)]
pub struct AddEntryRequest {
    #[validate(length(
        min = 1,
        max = 10000,
        message = "content must be between 1 and 10000 characters"
    ))]
    pub content: String,
}

/// POST /add-entry
///
/// Rejections from the JSON extractor are reported as 422, like failed validation.
pub async fn handle_add_entry(
    State(state): State<AppState>,
    payload: Result<Json<AddEntryRequest>, JsonRejection>,
) -> Result<Json<JournalEntry>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let entry = record_entry(state.analyzer.as_ref(), state.store.as_ref(), request.content)
        .await
        .map_err(AppError::persistence(SAVE_FAILED_DETAIL))?;

    Ok(Json(entry))
}

/// GET /history
pub async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<JournalEntry>>, AppError> {
    let entries = fetch_history(state.store.as_ref())
        .await
        .map_err(AppError::persistence(HISTORY_FAILED_DETAIL))?;
    Ok(Json(entries))
}
