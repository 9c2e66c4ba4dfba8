//! History routes.

use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Extension, Json};
use qrify_core::{SessionId, HISTORY_LIMIT};
use qrify_types::HistoryEntry;
use std::sync::Arc;

/// GET /api/history - The caller's most recent actions, newest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let records = state
        .store
        .recent(session.as_str(), HISTORY_LIMIT)
        .map_err(|e| ApiError::from_core("Failed to fetch history", e))?;

    Ok(Json(records.into_iter().map(HistoryEntry::from).collect()))
}
