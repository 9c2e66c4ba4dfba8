//! Qrify server library - HTTP API for generating and decoding QR codes.
//!
//! Separated from main.rs so integration tests can build the same router.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod session;
pub mod state;
