//! Weather Passport API Protocol
//!
//! This crate provides the wire types shared by the passport service and its
//! clients: current-alarm buttons, historical-probability buttons, the combined
//! passport payload, the gridded precipitation risk response and the error
//! body returned on failures.
//!
//! # Example
//!
//! ```rust
//! use passport_protocol::{Category, ThresholdDirection};
//!
//! let cold = Category::Cold;
//! assert_eq!(cold.metric_name(), "tmin_c");
//! assert!(ThresholdDirection::for_metric(cold.metric_name()).is_exceeded(5.0, 10.0));
//! ```

pub mod buttons;
pub mod category;
pub mod responses;
pub mod risk;

// Re-export commonly used types
pub use buttons::{CategoryMap, CombinedPassport, CurrentButton, HistoricalButton};
pub use category::{Category, ParseCategoryError, ThresholdDirection};
pub use responses::{ExceptionResponse, HealthResponse};
pub use risk::{GridRiskMeta, GridRiskResponse};
