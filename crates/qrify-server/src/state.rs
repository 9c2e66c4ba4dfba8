//! Shared application state.

use crate::config::Config;
use qrify_core::{HistoryStore, QrDecoder, RqrrDecoder};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub store: Arc<HistoryStore>,
    pub decoder: Arc<dyn QrDecoder>,
    pub config: Config,
}

impl AppState {
    /// Open the history store and use the default `rqrr` decoder.
    pub fn new(config: Config) -> qrify_core::Result<Self> {
        Self::with_decoder(config, Arc::new(RqrrDecoder::new()))
    }

    /// Open the history store with a caller-provided decode engine.
    pub fn with_decoder(config: Config, decoder: Arc<dyn QrDecoder>) -> qrify_core::Result<Self> {
        let store = Arc::new(HistoryStore::open(&config.db_path)?);
        Ok(Self {
            store,
            decoder,
            config,
        })
    }
}
