//! Full-snapshot handlers.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use passport_protocol::CombinedPassport;
use serde_json::Value;

use crate::error::ApiError;
use crate::snapshot::{self, CurrentSnapshot, HistoricalSnapshot, SnapshotKind};
use crate::state::AppState;

/// GET /api/passport/today - Current snapshot, verbatim
pub async fn today_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    metrics::counter!("passport_requests_total", "endpoint" => "today").increment(1);
    let value = snapshot::load_json(&state.config.current_path(), SnapshotKind::Current).await?;
    Ok(Json(value))
}

/// GET /api/passport/combined - Historical and live buttons together
pub async fn combined_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<CombinedPassport>, ApiError> {
    metrics::counter!("passport_requests_total", "endpoint" => "combined").increment(1);

    let current_path = state.config.current_path();
    let historical_path = state.config.historical_path();
    let (current, historical) = tokio::try_join!(
        CurrentSnapshot::load(&current_path),
        HistoricalSnapshot::load(&historical_path),
    )?;

    Ok(Json(snapshot::combine(&current, &historical)?))
}
