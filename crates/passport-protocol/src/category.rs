//! Alarm categories and the direction in which each one is adverse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metric whose alarm fires on low values rather than high ones.
pub const COLD_METRIC: &str = "tmin_c";

/// One of the four fixed adverse-weather categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    VeryWet,
    Windy,
    Heat,
    Cold,
}

impl Category {
    /// All categories, in the order they appear in responses.
    pub const ALL: [Category; 4] = [
        Category::VeryWet,
        Category::Windy,
        Category::Heat,
        Category::Cold,
    ];

    /// Key used in JSON payloads and historical snapshots (`very_wet`).
    pub fn key(&self) -> &'static str {
        match self {
            Category::VeryWet => "very_wet",
            Category::Windy => "windy",
            Category::Heat => "heat",
            Category::Cold => "cold",
        }
    }

    /// URL slug used by the current-button routes (`very-wet`).
    pub fn slug(&self) -> &'static str {
        match self {
            Category::VeryWet => "very-wet",
            Category::Windy => "windy",
            Category::Heat => "heat",
            Category::Cold => "cold",
        }
    }

    /// Name of the metric in the current snapshot's `metrics` mapping.
    pub fn metric_name(&self) -> &'static str {
        match self {
            Category::VeryWet => "precip_24h_mm",
            Category::Windy => "wind_sust_max_mps",
            Category::Heat => "tmax_c",
            Category::Cold => COLD_METRIC,
        }
    }

    /// Name of the threshold in the current snapshot's `thresholds` mapping.
    pub fn threshold_name(&self) -> &'static str {
        match self {
            Category::VeryWet => "very_wet_mm",
            Category::Windy => "windy_sust_mps",
            Category::Heat => "heat_c",
            Category::Cold => "cold_c",
        }
    }

    /// Direction in which this category's metric is adverse.
    pub fn direction(&self) -> ThresholdDirection {
        ThresholdDirection::for_metric(self.metric_name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts both the key (`very_wet`) and the slug (`very-wet`) spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s || c.slug() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Comparison used to decide whether a metric crossed its threshold.
///
/// Both directions are inclusive: a value equal to the threshold always
/// raises the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdDirection {
    /// Alarm when `value >= threshold` (rain, wind, heat).
    AtOrAbove,
    /// Alarm when `value <= threshold` (cold).
    AtOrBelow,
}

impl ThresholdDirection {
    /// Pick the direction for a metric name.
    pub fn for_metric(metric: &str) -> Self {
        if metric == COLD_METRIC {
            ThresholdDirection::AtOrBelow
        } else {
            ThresholdDirection::AtOrAbove
        }
    }

    /// Whether `value` is at or beyond `threshold` in the adverse direction.
    pub fn is_exceeded(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdDirection::AtOrAbove => value >= threshold,
            ThresholdDirection::AtOrBelow => value <= threshold,
        }
    }
}
