//! API error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qrify_core::QrifyError;
use qrify_types::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    Validation(String),

    /// The upload is an image but holds no readable QR code.
    #[error("QR code not found in image")]
    NotFound,

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Encoding or decoding failed. `message` is what the client sees.
    #[error("{message}")]
    Processing {
        message: &'static str,
        #[source]
        source: QrifyError,
    },

    /// The history store failed.
    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: QrifyError,
    },
}

impl ApiError {
    /// Classify a core error, using `message` as the client-facing text for
    /// server-side failures.
    pub fn from_core(message: &'static str, source: QrifyError) -> Self {
        match source {
            QrifyError::QrNotFound => ApiError::NotFound,
            QrifyError::Database(_) | QrifyError::StorePoisoned => {
                ApiError::Persistence { message, source }
            }
            _ => ApiError::Processing { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NotFound => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processing { .. } | ApiError::Persistence { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Processing { message, source } | ApiError::Persistence { message, source } => {
                tracing::error!(target: "qrify::api", "{}: {}", message, source);
            }
            _ => {
                tracing::debug!(target: "qrify::api", "Rejected request ({}): {}", status, self);
            }
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_classified() {
        let err = ApiError::from_core("Failed", QrifyError::QrNotFound);
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from_core(
            "Failed to generate QR code",
            QrifyError::InvalidColor("nope".into()),
        );
        assert!(matches!(err, ApiError::Processing { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to generate QR code");

        let err = ApiError::from_core("Failed to fetch history", QrifyError::StorePoisoned);
        assert!(matches!(err, ApiError::Persistence { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch history");

        let err = ApiError::from_core("Failed to decode QR code", QrifyError::Task("panicked".into()));
        assert!(matches!(err, ApiError::Processing { .. }));
        assert_eq!(err.to_string(), "Failed to decode QR code");
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = ApiError::PayloadTooLarge("too big".into());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
