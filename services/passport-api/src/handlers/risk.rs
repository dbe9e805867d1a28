//! Gridded precipitation risk handler.
//!
//! Resolves the grid file for the requested date, averages the precipitation
//! cells in a box around the point on the blocking pool, and compares the
//! mean with the threshold.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use chrono::NaiveDate;
use grid_processor::AreaQuery;
use passport_protocol::{GridRiskMeta, GridRiskResponse};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_RADIUS_KM: f64 = 25.0;
pub const MAX_RADIUS_KM: f64 = 100.0;
pub const DEFAULT_THRESHOLD_MM: f64 = 10.0;

/// Raw query string parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskQueryParams {
    pub lat: f64,
    pub lon: f64,
    pub date: String,
    pub radius_km: Option<f64>,
    pub threshold_mm: Option<f64>,
}

/// Parameters after range and date checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskRequest {
    pub lat: f64,
    pub lon: f64,
    pub date: NaiveDate,
    pub radius_km: f64,
    pub threshold_mm: f64,
}

impl RiskRequest {
    /// The date as `YYYY-MM-DD`, the key of the override table.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl RiskQueryParams {
    pub fn validate(self) -> Result<RiskRequest, ApiError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ApiError::Validation(format!(
                "lat must be between -90 and 90, got {}",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(ApiError::Validation(format!(
                "lon must be between -180 and 180, got {}",
                self.lon
            )));
        }

        let date = parse_date(&self.date)?;

        let radius_km = self.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        if !(radius_km > 0.0 && radius_km <= MAX_RADIUS_KM) {
            return Err(ApiError::Validation(format!(
                "radius_km must be greater than 0 and at most {}, got {}",
                MAX_RADIUS_KM, radius_km
            )));
        }

        let threshold_mm = self.threshold_mm.unwrap_or(DEFAULT_THRESHOLD_MM);
        if !(threshold_mm >= 0.0 && threshold_mm.is_finite()) {
            return Err(ApiError::Validation(format!(
                "threshold_mm must be a non-negative number, got {}",
                threshold_mm
            )));
        }

        Ok(RiskRequest {
            lat: self.lat,
            lon: self.lon,
            date,
            radius_km,
            threshold_mm,
        })
    }
}

/// Strict `YYYY-MM-DD` naming a real calendar day.
///
/// Two checks run in order. The shape check rejects anything that is not
/// four digits, dash, two digits, dash, two digits. The calendar check then
/// rejects well-formed strings with no matching day, so `2025-02-30` is a
/// 422 even though a plain pattern match would accept it. Grid files are
/// resolved per day and an impossible date can never name one.
fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ApiError::Validation(format!(
            "date must match YYYY-MM-DD, got {:?}",
            raw
        )));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("date {} is not a calendar date", raw)))
}

/// GET /api/risk/very-wet - Area-averaged daily rain around a point
pub async fn very_wet_risk_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<RiskQueryParams>, QueryRejection>,
) -> Result<Json<GridRiskResponse>, ApiError> {
    metrics::counter!("passport_requests_total", "endpoint" => "risk").increment(1);

    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let request = params.validate()?;

    let file_used = state.resolver.resolve(&request.date_key());
    let path = state.config.grid_dir().join(&file_used);
    debug!(
        date = %request.date,
        file = %file_used,
        lat = request.lat,
        lon = request.lon,
        radius_km = request.radius_km,
        "Resolved grid file"
    );

    let service = state.grid.clone();
    let query = AreaQuery::new(request.lat, request.lon, request.radius_km);
    let outcome = tokio::task::spawn_blocking(move || service.area_average(&path, &query))
        .await
        .map_err(|e| {
            error!(file = %file_used, error = %e, "Grid task failed");
            metrics::counter!("passport_grid_errors_total", "kind" => "task_failed").increment(1);
            ApiError::Processing(format!("processing error: grid task failed: {}", e))
        })?;

    let average = outcome.map_err(|e| {
        metrics::counter!("passport_grid_errors_total", "kind" => e.kind()).increment(1);
        if e.is_not_found() {
            warn!(file = %file_used, "Grid file not found");
        } else {
            error!(file = %file_used, error = %e, "Grid processing failed");
        }
        ApiError::from_grid(e, &file_used)
    })?;

    let meta = GridRiskMeta {
        data_source: state.config.grid.data_source.clone(),
        file_used,
        variable: average.variable,
    };

    Ok(Json(GridRiskResponse::evaluate(
        average.mean,
        average.valid_pixels,
        request.threshold_mm,
        meta,
    )))
}
