//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
///
/// Every field is optional on the wire so that a missing `url` surfaces as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Foreground color as a hex string (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    #[serde(default)]
    pub color: Option<String>,
    /// Requested PNG width in pixels.
    #[serde(default)]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// `data:image/png;base64,...`
    pub png: String,
    pub svg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub text: String,
}

/// Body of every non-2xx API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
