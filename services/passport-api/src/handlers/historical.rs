//! Historical-probability button handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use passport_protocol::{Category, HistoricalButton, ParseCategoryError};

use crate::error::ApiError;
use crate::snapshot::HistoricalSnapshot;
use crate::state::AppState;

/// GET /api/historical/:category - Historical probability for one category
pub async fn historical_button_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<HistoricalButton>, ApiError> {
    let category: Category = category
        .parse()
        .map_err(|e: ParseCategoryError| ApiError::NotFound(e.to_string()))?;
    metrics::counter!(
        "passport_requests_total",
        "endpoint" => "historical",
        "category" => category.key()
    )
    .increment(1);

    let snapshot = HistoricalSnapshot::load(&state.config.historical_path()).await?;
    Ok(Json(snapshot.button(category)?))
}
