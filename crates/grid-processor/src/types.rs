//! Core types for grid processing.

use serde::{Deserialize, Serialize};

/// Kilometres per degree used to turn a search radius into degrees.
///
/// Flat approximation applied to both axes; it overstates the longitude span
/// away from the equator.
pub const KM_PER_DEGREE: f64 = 111.0;

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Square box of half-width `radius_km` around a point.
    ///
    /// Bounds are not clamped; selection simply finds no cells past the edge
    /// of the grid.
    pub fn around(lat: f64, lon: f64, radius_km: f64) -> Self {
        let radius_deg = radius_km / KM_PER_DEGREE;
        Self::new(
            lon - radius_deg,
            lat - radius_deg,
            lon + radius_deg,
            lat + radius_deg,
        )
    }
}

/// Result of averaging a variable over a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaAverage {
    /// Mean of the finite cells; `None` when there are none.
    pub mean: Option<f64>,
    /// Number of finite cells that went into the mean.
    pub valid_pixels: usize,
    /// Cells selected by the box, finite or not.
    pub selected_cells: usize,
    /// Variable actually averaged.
    pub variable: String,
    pub bbox: BoundingBox,
}
