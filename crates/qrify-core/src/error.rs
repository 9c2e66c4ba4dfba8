//! Error types for Qrify.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrifyError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("QR code not found in image")]
    QrNotFound,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History store lock poisoned")]
    StorePoisoned,

    #[error("Background task failed: {0}")]
    Task(String),
}
