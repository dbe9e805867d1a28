//! Area averaging over gridded lat/lon datasets.
//!
//! This crate answers one question: what is the mean of a variable inside a
//! square box around a point? It handles:
//!
//! - **Box construction**: radius in km to degrees at a flat 111 km/degree
//! - **Axis order**: ascending and descending coordinate axes
//! - **Missing data**: only finite cells count towards the mean
//! - **Variable choice**: canonical names first, then the first data variable
//!
//! # Architecture
//!
//! ```text
//! Risk request
//!      │
//!      ▼
//! GridDataService::area_average(path, query)
//!      │
//!      ├─► NetCdfReader::read_header
//!      │
//!      ├─► resolve_variable (fallback chain) + spatial_dims
//!      │
//!      ├─► NetCdfReader::read_variables (variable, lat, lon)
//!      │
//!      └─► LatLonField::area_mean(BoundingBox::around(..))
//!               │
//!               ▼
//!          AreaAverage { mean, valid_pixels, variable }
//! ```

pub mod error;
pub mod field;
pub mod selection;
pub mod service;
pub mod types;
pub mod variable;

// Re-export commonly used types at crate root
pub use error::{GridProcessorError, Result};
pub use field::{AreaStats, BoxSelection, LatLonField};
pub use selection::{select_axis, AxisOrder, AxisSelection};
pub use service::{AreaQuery, GridDataService};
pub use types::{AreaAverage, BoundingBox, KM_PER_DEGREE};
pub use variable::{resolve_variable, ResolvedVariable, VariableSource, DEFAULT_VARIABLE_CANDIDATES};
