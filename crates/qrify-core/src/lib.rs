//! Core QR encoding, decoding and history persistence for Qrify.

mod db;
mod decode;
mod encode;
mod error;
mod session;

pub use db::{HistoryStore, HISTORY_LIMIT};
pub use decode::{QrDecoder, RasterImage, RqrrDecoder};
pub use encode::{
    encode, png_data_url, render_png, EncodedQr, HexColor, QrOptions, BACKGROUND,
    DEFAULT_FOREGROUND, DEFAULT_PNG_SIZE, QUIET_ZONE,
};
pub use error::QrifyError;
pub use session::{SessionId, SESSION_ID_MAX_LEN};

/// Result type for Qrify operations.
pub type Result<T> = std::result::Result<T, QrifyError>;
