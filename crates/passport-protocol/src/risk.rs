//! Gridded precipitation risk response.

use serde::{Deserialize, Serialize};

/// Where the area average came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRiskMeta {
    pub data_source: String,
    /// File name resolved for the requested date.
    pub file_used: String,
    /// Variable actually averaged, after the fallback chain.
    #[serde(rename = "var")]
    pub variable: String,
}

/// Area-averaged daily precipitation around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRiskResponse {
    /// `None` when the box held no finite cells.
    pub rain_mm_day: Option<f64>,
    pub very_wet: bool,
    pub threshold_mm: f64,
    pub valid_pixels: usize,
    pub meta: GridRiskMeta,
}

impl GridRiskResponse {
    /// Build a response from an optional mean and the threshold.
    ///
    /// A missing mean never raises the alarm.
    pub fn evaluate(
        mean: Option<f64>,
        valid_pixels: usize,
        threshold_mm: f64,
        meta: GridRiskMeta,
    ) -> Self {
        let mean = mean.filter(|m| m.is_finite());
        Self {
            rain_mm_day: mean,
            very_wet: mean.map(|m| m >= threshold_mm).unwrap_or(false),
            threshold_mm,
            valid_pixels,
            meta,
        }
    }
}
