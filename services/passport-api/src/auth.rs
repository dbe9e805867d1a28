//! Optional bearer-key gate.
//!
//! When no key is configured every request passes. Once a key is set, the
//! `Authorization` header must be exactly `Bearer <key>`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Check the request headers against the expected key.
pub fn check_bearer(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(key) = expected else {
        return Ok(());
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(value) if value == format!("Bearer {}", key) => Ok(()),
        Some(_) => Err(ApiError::Unauthorized("Invalid API key".to_string())),
        None => Err(ApiError::Unauthorized("Missing bearer token".to_string())),
    }
}

/// Middleware for gated routes.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = check_bearer(state.config.api_key.as_deref(), request.headers()) {
        warn!(path = %request.uri().path(), "Rejected request: {}", e);
        metrics::counter!("passport_requests_total", "endpoint" => "unauthorized").increment(1);
        return Err(e);
    }
    Ok(next.run(request).await)
}
