//! QR decoding route.

use super::run_blocking;
use crate::{error::ApiError, state::AppState};
use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        State,
    },
    http::StatusCode,
    Extension, Json,
};
use qrify_core::{RasterImage, SessionId};
use qrify_types::{DecodeResponse, NewHistoryRecord};
use std::sync::Arc;
use tracing::info;

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "qrfile";

const FAILED: &str = "Failed to decode QR code";
const NO_FILE: &str = "No file uploaded";

struct Upload {
    file_name: String,
    bytes: Bytes,
}

/// POST /api/decode - Read a QR code from an uploaded image and record it.
pub async fn decode(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DecodeResponse>, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::Validation(NO_FILE.to_string()))?;
    let upload = read_upload(&mut multipart)
        .await?
        .filter(|upload| !upload.bytes.is_empty())
        .ok_or_else(|| ApiError::Validation(NO_FILE.to_string()))?;

    let decoder = state.decoder.clone();
    let bytes = upload.bytes;
    let text = run_blocking(move || {
        let raster = RasterImage::from_bytes(&bytes)?;
        decoder.decode(&raster)
    })
    .await
    .map_err(|e| ApiError::from_core(FAILED, e))?;

    let record = NewHistoryRecord::decode(session.as_str(), upload.file_name, text.clone());
    state
        .store
        .insert(&record)
        .map_err(|e| ApiError::from_core(FAILED, e))?;

    info!(target: "qrify::api", "Decoded QR code for session {}", session);

    Ok(Json(DecodeResponse { text }))
}

/// Find the upload field, skipping any others.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}

fn upload_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::Validation(err.body_text())
    }
}
