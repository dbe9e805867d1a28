//! Passport data directories for service tests.
//!
//! A [`PassportFixture`] owns a temp dir laid out like the service's data
//! directory: the current snapshot, the historical snapshot and a `grids/`
//! folder. Files are only written when asked, so tests can leave any of them
//! missing.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// Default current snapshot file name.
pub const CURRENT_FILE: &str = "passport_day_2025-08-23.json";

/// Default historical snapshot file name.
pub const HISTORICAL_FILE: &str = "historical_passport_day_0823.json";

/// Grid sub-directory name.
pub const GRID_DIR: &str = "grids";

/// A current-day snapshot with the heat and cold alarms raised.
pub fn sample_current() -> Value {
    json!({
        "date": "2025-08-23",
        "location": {"lat": -23.55, "lon": -46.63},
        "metrics": {
            "precip_24h_mm": 3.2,
            "wind_sust_max_mps": 12.0,
            "tmax_c": 36.0,
            "tmin_c": 5.0
        },
        "thresholds": {
            "very_wet_mm": 20.0,
            "windy_sust_mps": 12.0,
            "heat_c": 35.0,
            "cold_c": 10.0
        }
    })
}

/// A historical snapshot; `cold` has no probability on record.
pub fn sample_historical() -> Value {
    json!({
        "day": "08-23",
        "buttons": {
            "very_wet": {"prob_any_window": 0.237, "threshold": 10},
            "windy": {"prob_any_window": 0.0, "threshold": 12.5},
            "heat": {"prob_any_window": 0.5, "threshold": 35},
            "cold": {"prob_any_window": null, "threshold": 10}
        }
    })
}

/// Temp data directory; removed on drop.
pub struct PassportFixture {
    dir: TempDir,
}

impl PassportFixture {
    /// An empty data directory with a `grids/` sub-directory.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join(GRID_DIR)).expect("create grid dir");
        Self { dir }
    }

    /// Both sample snapshots written.
    pub fn with_samples() -> Self {
        Self::empty()
            .with_current(&sample_current())
            .with_historical(&sample_historical())
    }

    pub fn with_current(self, value: &Value) -> Self {
        self.write_json(CURRENT_FILE, value);
        self
    }

    pub fn with_historical(self, value: &Value) -> Self {
        self.write_json(HISTORICAL_FILE, value);
        self
    }

    /// Create an (empty) grid file so existence checks pass; contents are
    /// served by an in-memory reader.
    pub fn with_grid_file(self, name: &str) -> Self {
        std::fs::write(self.grid_dir().join(name), b"").expect("write grid file");
        self
    }

    pub fn write_json(&self, name: &str, value: &Value) {
        let text = serde_json::to_string_pretty(value).expect("serialize fixture");
        std::fs::write(self.path().join(name), text).expect("write fixture");
    }

    pub fn write_raw(&self, name: &str, contents: &str) {
        std::fs::write(self.path().join(name), contents).expect("write fixture");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn grid_dir(&self) -> PathBuf {
        self.dir.path().join(GRID_DIR)
    }
}
