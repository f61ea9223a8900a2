use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::report::ReportSettings;
use crate::store::DEFAULT_RETENTION;

/// Top-level configuration. Every table and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub report: ReportSettings,
}

/// Where uploads are kept and how many per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store directory. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
    pub retention: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            retention: DEFAULT_RETENTION,
        }
    }
}

impl Config {
    /// # Errors
    /// Returns `ReportError::Config` for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.store.retention == 0 {
            return Err(ReportError::Config("store.retention must be at least 1".to_string()));
        }
        self.report.validate()
    }
}

/// Written by `equipment-report init`. Parses to [`Config::default`].
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# equipment-report configuration
#
# Looked up as .equipment-report.toml in the working directory, then
# config.toml in the platform config directory.

[store]
# Directory for uploaded datasets. Defaults to the platform data directory.
# path = "/var/lib/equipment-report"

# Uploads kept per owner; older ones are deleted.
retention = 5

[report]
title = "Chemical Equipment Report"
# author = "Plant engineering"

# Page margin in points (US Letter is 612 x 792).
margin = 72.0

# Chart height as a fraction of the content width.
type_chart_ratio = 0.45
analysis_chart_ratio = 0.4

# Preview table columns beyond this are dropped.
preview_columns = 6

[report.chart]
# Raster pixels per logical pixel.
scale = 2.0
label_max_len = 20
# Bar charts with at least this many categories are drawn horizontally.
horizontal_bar_threshold = 8
"#;

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
