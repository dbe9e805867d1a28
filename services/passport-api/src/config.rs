//! Passport API configuration loading and types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Service configuration, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Directory holding the snapshot files and, by default, the grids.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Current-day metrics snapshot, relative to `data_dir`.
    #[serde(default = "default_current_file")]
    pub current_file: String,

    /// Historical probability snapshot, relative to `data_dir`.
    #[serde(default = "default_historical_file")]
    pub historical_file: String,

    #[serde(default)]
    pub grid: GridConfig,

    /// Expected bearer key for gated routes. Taken from `API_KEY`, never
    /// from the YAML file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Gridded precipitation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid directory; relative paths resolve against `data_dir`.
    #[serde(default = "default_grid_dir")]
    pub dir: PathBuf,

    /// File name template; `{date}` becomes `YYYYMMDD`.
    #[serde(default = "default_file_template")]
    pub file_template: String,

    /// Explicit file names for dates whose files break the template.
    #[serde(default)]
    pub file_overrides: BTreeMap<String, String>,

    /// Variable names tried in order before falling back to the first data
    /// variable.
    #[serde(default = "default_variable_candidates")]
    pub variable_candidates: Vec<String>,

    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// `ncdump` binary used by the default reader.
    #[serde(default = "default_ncdump_path")]
    pub ncdump_path: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_current_file() -> String {
    "passport_day_2025-08-23.json".to_string()
}

fn default_historical_file() -> String {
    "historical_passport_day_0823.json".to_string()
}

fn default_grid_dir() -> PathBuf {
    PathBuf::from("grids")
}

fn default_file_template() -> String {
    "3B-DAY.MS.MRG.3IMERG.{date}-S000000-E235959.V07B.nc4".to_string()
}

fn default_variable_candidates() -> Vec<String> {
    grid_processor::DEFAULT_VARIABLE_CANDIDATES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_data_source() -> String {
    "NASA GPM IMERG Final (daily)".to_string()
}

fn default_ncdump_path() -> String {
    "ncdump".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            current_file: default_current_file(),
            historical_file: default_historical_file(),
            grid: GridConfig::default(),
            api_key: None,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dir: default_grid_dir(),
            file_template: default_file_template(),
            file_overrides: BTreeMap::new(),
            variable_candidates: default_variable_candidates(),
            data_source: default_data_source(),
            ncdump_path: default_ncdump_path(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                "Passport config file {} does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse: {:?}", path))?;

        tracing::info!(
            config = %path.display(),
            data_dir = %config.data_dir.display(),
            overrides = config.grid.file_overrides.len(),
            "Loaded passport config"
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Set the bearer key. Empty or whitespace-only keys leave the gate open.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn current_path(&self) -> PathBuf {
        self.data_dir.join(&self.current_file)
    }

    pub fn historical_path(&self) -> PathBuf {
        self.data_dir.join(&self.historical_file)
    }

    pub fn grid_dir(&self) -> PathBuf {
        if self.grid.dir.is_absolute() {
            self.grid.dir.clone()
        } else {
            self.data_dir.join(&self.grid.dir)
        }
    }
}
