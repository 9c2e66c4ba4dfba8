//! HTTP route handlers and router assembly.

pub mod decode;
pub mod generate;
pub mod history;

use crate::{config::Config, session, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use qrify_core::QrifyError;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full application: `/api` routes behind the session middleware,
/// optional static fallback, CORS and request tracing.
pub fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/generate", post(generate::generate))
        .route(
            "/decode",
            post(decode::decode).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/history", get(history::list))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::assign_session,
        ))
        // Registered after the session layer: health checks get no cookie.
        .route("/health", get(health));

    let mut app = Router::new().nest("/api", api_routes);
    if let Some(dir) = &state.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    Ok(app
        .layer(cors_layer(&state.config)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// CORS restricted to the configured frontend origin, with credentials.
fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(config.frontend_url.trim_end_matches('/'))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Run CPU-bound work on the blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> qrify_core::Result<T>
where
    F: FnOnce() -> qrify_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| QrifyError::Task(e.to_string()))?
}
