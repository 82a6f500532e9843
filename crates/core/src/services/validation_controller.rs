use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::ticker::{DateBounds, TickerInfo, TickerValidation, ValidationState};
use crate::services::time_codec;

/// What applying a lookup response did to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The ticker exists and has usable bounds.
    Validated(DateBounds),
    /// The backend found no match.
    Rejected,
    /// The ticker exists but its bounds are malformed or empty.
    NoHistory,
    /// The response does not belong to the pending lookup and was ignored.
    Stale,
}

/// Tracks the ticker input and whether it has been confirmed by the backend.
///
/// The validation record is keyed by the exact ticker it applies to, so a
/// record for `AAPL` never enables anything while the input reads `AAPL2`.
#[derive(Debug, Clone, Default)]
pub struct ValidationController {
    input: String,
    validation: TickerValidation,
    /// Record in place before the current lookup started; restored if it fails.
    before_pending: Option<TickerValidation>,
}

impl ValidationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live ticker input (upper-cased).
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn validation(&self) -> &TickerValidation {
        &self.validation
    }

    /// Replace the ticker input. Clearing it resets validation.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.trim().to_uppercase();
        if self.input.is_empty() {
            self.validation = TickerValidation::None;
            self.before_pending = None;
        }
    }

    /// Start a lookup for the current input. Returns the ticker to look up,
    /// or `None` when the input is empty.
    pub fn begin(&mut self) -> Option<String> {
        if self.input.is_empty() {
            self.validation = TickerValidation::None;
            return None;
        }
        let ticker = self.input.clone();
        let previous = std::mem::replace(
            &mut self.validation,
            TickerValidation::Pending { ticker: ticker.clone() },
        );
        if !matches!(previous, TickerValidation::Pending { .. }) {
            self.before_pending = Some(previous);
        }
        debug!(ticker = %ticker, "Ticker lookup started");
        Some(ticker)
    }

    /// Apply a lookup response. Responses whose echoed ticker is not the one
    /// currently pending are discarded without changing state.
    pub fn apply(&mut self, response: &TickerInfo) -> ValidationOutcome {
        let ticker = match &self.validation {
            TickerValidation::Pending { ticker } if *ticker == response.ticker => ticker.clone(),
            TickerValidation::Pending { ticker } => {
                debug!(
                    pending = %ticker,
                    echoed = %response.ticker,
                    "Discarding stale ticker lookup"
                );
                return ValidationOutcome::Stale;
            }
            _ => {
                debug!(echoed = %response.ticker, "Discarding ticker lookup with nothing pending");
                return ValidationOutcome::Stale;
            }
        };
        self.before_pending = None;

        if !response.exists {
            info!(ticker = %ticker, "Ticker not found");
            self.validation = TickerValidation::Invalid { ticker };
            return ValidationOutcome::Rejected;
        }

        match parse_bounds(response) {
            Ok(bounds) => {
                info!(ticker = %ticker, min = %bounds.min, max = %bounds.max, "Ticker validated");
                self.validation = TickerValidation::Valid { ticker, bounds };
                ValidationOutcome::Validated(bounds)
            }
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Ticker has no usable history");
                self.validation = TickerValidation::NoHistory { ticker };
                ValidationOutcome::NoHistory
            }
        }
    }

    /// The lookup for `ticker` failed in transport. If it is still the pending
    /// lookup, the record that was in place before it is restored.
    pub fn fail(&mut self, ticker: &str, error: &CoreError) {
        let is_pending = matches!(
            &self.validation,
            TickerValidation::Pending { ticker: pending } if pending == ticker
        );
        if is_pending {
            warn!(ticker = %ticker, error = %error, "Ticker lookup failed");
            self.validation = self.before_pending.take().unwrap_or_default();
        } else {
            debug!(ticker = %ticker, error = %error, "Ignoring failure of stale ticker lookup");
        }
    }

    /// State shown next to the input. A record keyed by a different ticker
    /// than the live input shows as `none`.
    #[must_use]
    pub fn displayed_state(&self) -> ValidationState {
        match self.validation.ticker() {
            Some(ticker) if ticker == self.input => self.validation.state(),
            _ => ValidationState::None,
        }
    }

    /// Running a backtest requires a successful validation of the live input.
    #[must_use]
    pub fn can_run(&self) -> bool {
        self.validation.is_valid_for(&self.input)
    }

    /// The validated ticker and its bounds, when running is allowed.
    #[must_use]
    pub fn validated(&self) -> Option<(&str, DateBounds)> {
        match &self.validation {
            TickerValidation::Valid { ticker, bounds } if *ticker == self.input => {
                Some((ticker.as_str(), *bounds))
            }
            _ => None,
        }
    }
}

/// Both bounds must parse and leave room for at least a one-day window.
fn parse_bounds(response: &TickerInfo) -> Result<DateBounds, CoreError> {
    let min_wire = response
        .min_date
        .as_deref()
        .ok_or_else(|| CoreError::ValidationError(format!("{} has no minDate", response.ticker)))?;
    let max_wire = response
        .max_date
        .as_deref()
        .ok_or_else(|| CoreError::ValidationError(format!("{} has no maxDate", response.ticker)))?;

    let min = time_codec::to_local_day(min_wire)?;
    let max = time_codec::to_local_day(max_wire)?;
    if min >= max {
        return Err(CoreError::InvalidDateRange(format!(
            "minDate {min} is not before maxDate {max}"
        )));
    }
    Ok(DateBounds { min, max })
}
