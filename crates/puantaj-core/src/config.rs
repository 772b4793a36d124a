//! Engine configuration
//!
//! Loaded from TOML; every field has a default so an empty file (or no
//! file at all) is a valid configuration.
//!
//! ```toml
//! max_window_days = 366
//! max_records = 10000
//! currency = "EUR"
//! date_format = "%d/%m/%Y"
//! marker = "X"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default ceiling on the number of days a report may span (about five years)
pub const DEFAULT_MAX_WINDOW_DAYS: u32 = 1830;

/// Default ceiling on the number of selected records
pub const DEFAULT_MAX_RECORDS: usize = 50_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Ceiling on the effective window span and on the date-universe span
    pub max_window_days: u32,
    /// Ceiling on the number of records a single report may contain
    pub max_records: usize,
    /// Display unit for money columns
    pub currency: String,
    /// `strftime` pattern for date headers and date fields
    pub date_format: String,
    /// Cell text for an attended day
    pub marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
            max_records: DEFAULT_MAX_RECORDS,
            currency: "TL".into(),
            date_format: "%d.%m.%Y".into(),
            marker: "✓".into(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn max_window_days(mut self, days: u32) -> Self {
        self.max_window_days = days;
        self
    }

    pub fn max_records(mut self, count: usize) -> Self {
        self.max_records = count;
        self
    }
}

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
