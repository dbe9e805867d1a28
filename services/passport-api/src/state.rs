//! Application state for the passport API.

use std::sync::Arc;

use grid_processor::GridDataService;
use metrics_exporter_prometheus::PrometheusHandle;
use netcdf_parser::NetCdfReader;

use crate::config::ApiConfig;
use crate::resolver::GridFileResolver;

/// Shared, read-only application state.
pub struct AppState {
    /// Configuration fixed at startup.
    pub config: Arc<ApiConfig>,

    /// Date to grid file name mapping.
    pub resolver: GridFileResolver,

    /// Area averages over grid files.
    pub grid: GridDataService,

    /// Prometheus recorder handle, when one is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state that reads grids with the default NetCDF reader.
    pub fn new(config: ApiConfig) -> Self {
        let reader = netcdf_parser::default_reader(&config.grid.ncdump_path);
        Self::with_reader(config, reader)
    }

    /// Create state around an explicit reader.
    pub fn with_reader(config: ApiConfig, reader: Arc<dyn NetCdfReader>) -> Self {
        let resolver = GridFileResolver::new(
            config.grid.file_template.clone(),
            config.grid.file_overrides.clone(),
        );
        let grid = GridDataService::new(reader, config.grid.variable_candidates.clone());

        Self {
            config: Arc::new(config),
            resolver,
            grid,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
