use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::CoreError;
use crate::services::display_formatter::MAX_ROUNDING_DIGITS;

/// User-configurable settings. Any field missing from a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the backtest backend (e.g., "http://localhost:5000").
    pub api_base_url: String,

    /// Upper bound on the number of points handed to the chart.
    pub max_chart_points: usize,

    /// Decimal places shown for every return figure.
    pub rounding_digits: i32,

    /// Colour for non-negative returns.
    pub positive_colour: String,

    /// Colour for negative returns.
    pub negative_colour: String,

    /// Legend key of the strategy line.
    pub strategy_label: String,

    /// HTTP request timeout, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            max_chart_points: 1000,
            rounding_digits: 2,
            positive_colour: "green".to_string(),
            negative_colour: "red".to_string(),
            strategy_label: "LSTM Bot".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Reject values the rest of the core cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(CoreError::Config("api_base_url must not be empty".into()));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(CoreError::Config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        if self.max_chart_points == 0 {
            return Err(CoreError::Config("max_chart_points must be at least 1".into()));
        }
        if !(0..=MAX_ROUNDING_DIGITS).contains(&self.rounding_digits) {
            return Err(CoreError::Config(format!(
                "rounding_digits must be between 0 and {MAX_ROUNDING_DIGITS}, got {}",
                self.rounding_digits
            )));
        }
        Ok(())
    }
}
