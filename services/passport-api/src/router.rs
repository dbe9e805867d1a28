//! Route table.

use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::handlers;
use crate::state::AppState;

/// Build the service router around shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Routes behind the optional bearer key
    let gated = Router::new()
        .route(
            "/api/risk/very-wet",
            get(handlers::risk::very_wet_risk_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_bearer,
        ));

    Router::new()
        // Snapshots
        .route("/api/passport/today", get(handlers::passport::today_handler))
        .route(
            "/api/passport/combined",
            get(handlers::passport::combined_handler),
        )
        // Buttons
        .route(
            "/api/buttons/:category",
            get(handlers::buttons::current_button_handler),
        )
        .route(
            "/api/historical/:category",
            get(handlers::historical::historical_button_handler),
        )
        .merge(gated)
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
