use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope of `GET /api/info/{ticker}`.
///
/// The backend omits the date bounds when the ticker does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerInfo {
    /// The ticker the backend looked up (echoed back)
    pub ticker: String,

    pub exists: bool,

    /// Earliest available day, as a wire date
    #[serde(default)]
    pub min_date: Option<String>,

    /// Latest available day, as a wire date
    #[serde(default)]
    pub max_date: Option<String>,
}

/// Earliest and latest day of history available for a validated ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// What the ticker field shows next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    None,
    Pending,
    Success,
    Error,
    Warning,
}

impl ValidationState {
    /// Inline message rendered under the ticker input.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ValidationState::None => "Enter a ticker (compatible with Yahoo Finance)",
            ValidationState::Pending => "Checking ticker...",
            ValidationState::Success => "Valid ticker.",
            ValidationState::Error => "Enter a valid ticker.",
            ValidationState::Warning => "No usable history for this ticker.",
        }
    }
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationState::None => "none",
            ValidationState::Pending => "pending",
            ValidationState::Success => "success",
            ValidationState::Error => "error",
            ValidationState::Warning => "warning",
        };
        write!(f, "{s}")
    }
}

/// Validation record, keyed by the exact ticker string it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TickerValidation {
    /// Nothing entered, or the input was cleared.
    #[default]
    None,

    /// A lookup for `ticker` is in flight.
    Pending { ticker: String },

    /// The backend confirmed `ticker` and returned usable bounds.
    Valid { ticker: String, bounds: DateBounds },

    /// The backend found no match for `ticker`.
    Invalid { ticker: String },

    /// `ticker` exists but its history bounds are malformed or empty.
    NoHistory { ticker: String },
}

impl TickerValidation {
    /// The ticker this record is keyed by, if any.
    #[must_use]
    pub fn ticker(&self) -> Option<&str> {
        match self {
            TickerValidation::None => None,
            TickerValidation::Pending { ticker }
            | TickerValidation::Valid { ticker, .. }
            | TickerValidation::Invalid { ticker }
            | TickerValidation::NoHistory { ticker } => Some(ticker),
        }
    }

    #[must_use]
    pub fn state(&self) -> ValidationState {
        match self {
            TickerValidation::None => ValidationState::None,
            TickerValidation::Pending { .. } => ValidationState::Pending,
            TickerValidation::Valid { .. } => ValidationState::Success,
            TickerValidation::Invalid { .. } => ValidationState::Error,
            TickerValidation::NoHistory { .. } => ValidationState::Warning,
        }
    }

    /// Bounds of a successful validation.
    #[must_use]
    pub fn bounds(&self) -> Option<DateBounds> {
        match self {
            TickerValidation::Valid { bounds, .. } => Some(*bounds),
            _ => None,
        }
    }

    /// True only for a successful validation of exactly `input`.
    #[must_use]
    pub fn is_valid_for(&self, input: &str) -> bool {
        matches!(self, TickerValidation::Valid { ticker, .. } if ticker == input)
    }
}
