//! Passport snapshot files.
//!
//! Snapshots are read fresh on every request. The current snapshot holds
//! `metrics` and `thresholds` mappings; the historical snapshot holds a
//! `buttons` mapping keyed by category.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use passport_protocol::{
    Category, CategoryMap, CombinedPassport, CurrentButton, HistoricalButton,
};
use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::{debug, error};

use crate::error::ApiError;

/// Which snapshot a file holds; names it in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Current,
    Historical,
}

impl SnapshotKind {
    fn label(&self) -> &'static str {
        match self {
            SnapshotKind::Current => "Current passport",
            SnapshotKind::Historical => "Historical passport",
        }
    }
}

/// Read and parse a snapshot as raw JSON.
pub async fn load_json(path: &Path, kind: SnapshotKind) -> Result<Value, ApiError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Snapshot file missing");
            return Err(ApiError::NotFound(format!("{} file not found", kind.label())));
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read snapshot");
            return Err(ApiError::Processing(format!(
                "Failed to read {} file: {}",
                kind.label().to_lowercase(),
                e
            )));
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        error!(path = %path.display(), error = %e, "Invalid snapshot JSON");
        ApiError::Processing(format!(
            "Invalid JSON in {} file: {}",
            kind.label().to_lowercase(),
            e
        ))
    })
}

/// Current-day metrics and their thresholds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentSnapshot {
    #[serde(default)]
    pub metrics: HashMap<String, Value>,
    #[serde(default)]
    pub thresholds: HashMap<String, Value>,
}

impl CurrentSnapshot {
    pub async fn load(path: &Path) -> Result<Self, ApiError> {
        let value = load_json(path, SnapshotKind::Current).await?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        serde_json::from_value(value).map_err(|e| {
            ApiError::Processing(format!("Malformed current passport: {}", e))
        })
    }

    /// Evaluate the alarm for one category.
    ///
    /// Missing metric or threshold keys are not found, never zero.
    pub fn button(&self, category: Category) -> Result<CurrentButton, ApiError> {
        let value = lookup(&self.metrics, category.metric_name(), "Metric")?;
        let threshold = lookup(&self.thresholds, category.threshold_name(), "Threshold")?;

        Ok(CurrentButton {
            flag: category.direction().is_exceeded(value, threshold),
            value,
            threshold,
        })
    }
}

fn lookup(map: &HashMap<String, Value>, key: &str, what: &str) -> Result<f64, ApiError> {
    let raw = map
        .get(key)
        .ok_or_else(|| ApiError::NotFound(format!("{} {} not found", what, key)))?;

    coerce_f64(raw)
        .ok_or_else(|| ApiError::Processing(format!("{} {} is not numeric: {}", what, key, raw)))
}

/// JSON numbers and numeric strings both count as numbers.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Historical record for one category; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalEntry {
    #[serde(default)]
    pub prob_any_window: Option<f64>,
    #[serde(default)]
    pub threshold: Option<Number>,
}

/// Historical probabilities keyed by category.
///
/// Entries stay raw until asked for, so keys that are not categories never
/// make the snapshot unreadable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalSnapshot {
    #[serde(default)]
    pub buttons: HashMap<String, Value>,
}

impl HistoricalSnapshot {
    pub async fn load(path: &Path) -> Result<Self, ApiError> {
        let value = load_json(path, SnapshotKind::Historical).await?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        serde_json::from_value(value).map_err(|e| {
            ApiError::Processing(format!("Malformed historical passport: {}", e))
        })
    }

    /// A category missing from the snapshot reports no data.
    pub fn button(&self, category: Category) -> Result<HistoricalButton, ApiError> {
        let entry = match self.buttons.get(category.key()) {
            None | Some(Value::Null) => HistoricalEntry::default(),
            Some(raw) => HistoricalEntry::deserialize(raw).map_err(|e| {
                ApiError::Processing(format!(
                    "Malformed historical entry {}: {}",
                    category.key(),
                    e
                ))
            })?,
        };
        Ok(HistoricalButton::from_probability(
            category,
            entry.prob_any_window,
            entry.threshold,
        ))
    }
}

/// Both snapshots for the combined route.
pub fn combine(
    current: &CurrentSnapshot,
    historical: &HistoricalSnapshot,
) -> Result<CombinedPassport, ApiError> {
    let live_forecast = CategoryMap::try_from_fn(|c| current.button(c))?;
    let event_history = CategoryMap::try_from_fn(|c| historical.button(c))?;

    Ok(CombinedPassport {
        event_history,
        live_forecast,
    })
}
