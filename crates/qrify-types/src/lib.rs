//! Shared types for the Qrify QR code service.

mod api;
mod history;

pub use api::*;
pub use history::*;
