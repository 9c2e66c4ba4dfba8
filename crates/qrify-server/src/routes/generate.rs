//! QR generation route.

use super::run_blocking;
use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use qrify_core::{HexColor, QrOptions, SessionId, DEFAULT_FOREGROUND, DEFAULT_PNG_SIZE};
use qrify_types::{GenerateRequest, GenerateResponse, NewHistoryRecord};
use std::sync::Arc;
use tracing::info;

const FAILED: &str = "Failed to generate QR code";

/// POST /api/generate - Encode a URL as PNG and SVG and record it.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    // Blank input is rejected, but the payload is encoded and stored verbatim.
    let url = req
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("URL is required".to_string()))?;

    let foreground = match req.color.as_deref().map(str::trim) {
        Some(color) if !color.is_empty() => color
            .parse::<HexColor>()
            .map_err(|e| ApiError::from_core(FAILED, e))?,
        _ => DEFAULT_FOREGROUND,
    };
    let size = req
        .size
        .unwrap_or(DEFAULT_PNG_SIZE)
        .clamp(1, state.config.max_png_size);

    let options = QrOptions { foreground, size };
    let payload = url.clone();
    let encoded = run_blocking(move || qrify_core::encode(&payload, &options))
        .await
        .map_err(|e| ApiError::from_core(FAILED, e))?;

    let record = NewHistoryRecord::generate(session.as_str(), url, foreground.to_string(), size);
    state
        .store
        .insert(&record)
        .map_err(|e| ApiError::from_core(FAILED, e))?;

    info!(
        target: "qrify::api",
        "Generated QR code ({}px, {}) for session {}",
        size, foreground, session
    );

    Ok(Json(GenerateResponse {
        png: encoded.png_data_url,
        svg: encoded.svg,
    }))
}
