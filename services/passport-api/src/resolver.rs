//! Grid file name resolution.
//!
//! Dates listed in the override table map to their registered file name
//! verbatim. Every other date is substituted into the file template with the
//! separators removed, so `2025-08-23` becomes `20250823`.

use std::collections::BTreeMap;

use tracing::debug;

/// Placeholder replaced by the compact date in the file template.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// Maps request dates to grid file names.
#[derive(Debug, Clone)]
pub struct GridFileResolver {
    template: String,
    overrides: BTreeMap<String, String>,
}

impl GridFileResolver {
    pub fn new(template: impl Into<String>, overrides: BTreeMap<String, String>) -> Self {
        Self {
            template: template.into(),
            overrides,
        }
    }

    /// File name for a `YYYY-MM-DD` date.
    pub fn resolve(&self, date: &str) -> String {
        if let Some(name) = self.overrides.get(date) {
            debug!(date, file = %name, "Grid file from override table");
            return name.clone();
        }

        let compact: String = date.chars().filter(|c| c.is_ascii_digit()).collect();
        self.template.replace(DATE_PLACEHOLDER, &compact)
    }
}
