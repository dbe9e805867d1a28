//! Current-alarm button handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use passport_protocol::{Category, CurrentButton, ParseCategoryError};
use tracing::debug;

use crate::error::ApiError;
use crate::snapshot::CurrentSnapshot;
use crate::state::AppState;

/// GET /api/buttons/:category - Current alarm for one category
///
/// Accepts the hyphenated slug (`very-wet`) or the key (`very_wet`).
pub async fn current_button_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<CurrentButton>, ApiError> {
    let category: Category = category
        .parse()
        .map_err(|e: ParseCategoryError| ApiError::NotFound(e.to_string()))?;
    metrics::counter!(
        "passport_requests_total",
        "endpoint" => "button",
        "category" => category.key()
    )
    .increment(1);

    let snapshot = CurrentSnapshot::load(&state.config.current_path()).await?;
    let button = snapshot.button(category)?;

    debug!(
        category = %category,
        value = button.value,
        threshold = button.threshold,
        flag = button.flag,
        "Evaluated current button"
    );
    Ok(Json(button))
}
