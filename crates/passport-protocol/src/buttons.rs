//! Button payloads for the current and historical passport routes.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::category::Category;

/// Current-day alarm for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentButton {
    /// Whether the metric crossed its threshold in the adverse direction.
    pub flag: bool,
    pub value: f64,
    pub threshold: f64,
}

/// Historical probability of an adverse event for one category.
///
/// `probability_percent` is `None` when the snapshot has no probability for the
/// category; `Some(0.0)` means the event never occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalButton {
    pub metric: String,
    pub probability_percent: Option<f64>,
    /// Threshold echoed exactly as stored in the snapshot.
    pub threshold: Option<Number>,
}

impl HistoricalButton {
    /// Build a button from a raw probability in `[0, 1]`.
    pub fn from_probability(
        category: Category,
        probability: Option<f64>,
        threshold: Option<Number>,
    ) -> Self {
        Self {
            metric: category.key().to_string(),
            probability_percent: probability.map(to_percent),
            threshold,
        }
    }
}

/// Convert a probability to a percentage rounded to one decimal place.
///
/// Rounds the binary value of `probability * 100` directly. Scaling by ten
/// first would round a second time, turning 0.15 (stored just below) into 0.2.
pub fn to_percent(probability: f64) -> f64 {
    let percent = probability * 100.0;
    format!("{:.1}", percent).parse().unwrap_or(percent)
}

/// One value per category, serialized with the category keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap<T> {
    pub very_wet: T,
    pub windy: T,
    pub heat: T,
    pub cold: T,
}

impl<T> CategoryMap<T> {
    /// Build a map by evaluating `f` for each category in order.
    pub fn try_from_fn<E>(mut f: impl FnMut(Category) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            very_wet: f(Category::VeryWet)?,
            windy: f(Category::Windy)?,
            heat: f(Category::Heat)?,
            cold: f(Category::Cold)?,
        })
    }
}

/// Historical and live views of all four categories in one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPassport {
    pub event_history: CategoryMap<HistoricalButton>,
    pub live_forecast: CategoryMap<CurrentButton>,
}
