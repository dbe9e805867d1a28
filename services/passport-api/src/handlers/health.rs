//! Health, readiness and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use passport_protocol::HealthResponse;
use serde::Serialize;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "passport-api";

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub current_snapshot: &'static str,
    pub historical_snapshot: &'static str,
    pub grid_dir: &'static str,
}

fn presence(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "missing"
    }
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok(SERVICE_NAME, env!("CARGO_PKG_VERSION")))
}

/// GET /ready - Readiness check (verifies the data directory layout)
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let config = &state.config;
    let current = config.current_path().is_file();
    let historical = config.historical_path().is_file();
    let grids = config.grid_dir().is_dir();

    let response = ReadyResponse {
        ready: current && historical && grids,
        current_snapshot: presence(current),
        historical_snapshot: presence(historical),
        grid_dir: presence(grids),
    };

    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response)).into_response()
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    // No recorder installed (tests, embedded use): nothing to expose
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
