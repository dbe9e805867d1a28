//! High-level grid data service.
//!
//! `GridDataService` opens a grid file, picks the variable, reads the
//! coordinates and averages the cells around a point.
//!
//! # Example
//!
//! ```rust,ignore
//! use grid_processor::{AreaQuery, GridDataService};
//!
//! let service = GridDataService::new(reader, vec!["precipitation".into()]);
//! let avg = service.area_average(&path, &AreaQuery::new(-23.55, -46.63, 25.0))?;
//! println!("{} mm/day over {} cells", avg.mean.unwrap_or(f64::NAN), avg.valid_pixels);
//! ```

use std::path::Path;
use std::sync::Arc;

use netcdf_parser::NetCdfReader;
use tracing::debug;

use crate::error::{GridProcessorError, Result};
use crate::field::LatLonField;
use crate::types::{AreaAverage, BoundingBox};
use crate::variable::{resolve_variable, spatial_dims, DEFAULT_VARIABLE_CANDIDATES};

/// Center and radius of an area-average request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

impl AreaQuery {
    pub fn new(lat: f64, lon: f64, radius_km: f64) -> Self {
        Self {
            lat,
            lon,
            radius_km,
        }
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::around(self.lat, self.lon, self.radius_km)
    }
}

/// Service for area averages over gridded files.
///
/// Stateless apart from its configuration; every call opens the file afresh.
/// All methods block and belong on a blocking thread in async code.
#[derive(Clone)]
pub struct GridDataService {
    reader: Arc<dyn NetCdfReader>,
    candidates: Vec<String>,
}

impl GridDataService {
    /// Create a service with an explicit variable fallback list.
    pub fn new(reader: Arc<dyn NetCdfReader>, candidates: Vec<String>) -> Self {
        Self { reader, candidates }
    }

    /// Create a service with the default IMERG variable names.
    pub fn with_default_candidates(reader: Arc<dyn NetCdfReader>) -> Self {
        let candidates = DEFAULT_VARIABLE_CANDIDATES
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::new(reader, candidates)
    }

    /// Load the chosen variable with its coordinates.
    pub fn load_field(&self, path: &Path) -> Result<(String, LatLonField)> {
        if !path.exists() {
            return Err(GridProcessorError::SourceNotFound(path.to_path_buf()));
        }

        let header = self
            .reader
            .read_header(path)
            .map_err(|e| GridProcessorError::open_failed(e.to_string()))?;

        let resolved = resolve_variable(&header, &self.candidates)?;
        let var = header
            .variable(&resolved.name)
            .ok_or_else(|| GridProcessorError::NoSuchVariable(resolved.name.clone()))?;
        let (lat_dim, lon_dim) = spatial_dims(&header, var)?;
        let shape = header.shape(&var.name).ok_or_else(|| {
            GridProcessorError::read_failed(format!("undeclared dimension in {}", var.name))
        })?;

        let names = [var.name.as_str(), lat_dim.name.as_str(), lon_dim.name.as_str()];
        let mut data = self
            .reader
            .read_variables(path, &header, &names)
            .map_err(|e| GridProcessorError::read_failed(e.to_string()))?;

        let mut take = |name: &str| {
            data.remove(name)
                .ok_or_else(|| GridProcessorError::read_failed(format!("no data for {}", name)))
        };
        let values = take(&var.name)?;
        let lats = take(&lat_dim.name)?;
        let lons = take(&lon_dim.name)?;

        debug!(
            path = %path.display(),
            variable = %var.name,
            shape = ?shape,
            "Loaded grid field"
        );

        let field = LatLonField::new(values, shape, lat_dim.position, lon_dim.position, lats, lons)?;
        Ok((resolved.name, field))
    }

    /// Average the grid around the query point.
    pub fn area_average(&self, path: &Path, query: &AreaQuery) -> Result<AreaAverage> {
        let (variable, field) = self.load_field(path)?;
        let bbox = query.bbox();
        let stats = field.area_mean(&bbox)?;

        debug!(
            variable = %variable,
            valid_pixels = stats.valid_pixels,
            selected_cells = stats.selected_cells,
            mean = ?stats.mean,
            "Computed area average"
        );

        Ok(AreaAverage {
            mean: stats.mean,
            valid_pixels: stats.valid_pixels,
            selected_cells: stats.selected_cells,
            variable,
            bbox,
        })
    }
}
