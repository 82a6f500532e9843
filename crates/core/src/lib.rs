pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    chart::{ChartData, ReturnSummary, Tooltip},
    date_range::DateRange,
    performance::BacktestResult,
    settings::Settings,
    ticker::{TickerInfo, TickerValidation, ValidationState},
};
use providers::{http::HttpBacktestProvider, traits::BacktestProvider};
use services::{
    backtest_service::BacktestService,
    chart_service::ChartService,
    validation_controller::{ValidationController, ValidationOutcome},
};
use tracing::warn;

use errors::CoreError;

/// Main entry point for the backtest viewer core library.
/// Holds one viewing session: ticker input, its validation, the selected
/// window and the last backtest that was loaded.
#[must_use]
pub struct BacktestViewer {
    settings: Settings,
    provider: Box<dyn BacktestProvider>,
    controller: ValidationController,
    date_range: DateRange,
    backtest_service: BacktestService,
    chart_service: ChartService,
    result: Option<BacktestResult>,
}

impl std::fmt::Debug for BacktestViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BacktestViewer")
            .field("provider", &self.provider.name())
            .field("ticker_input", &self.controller.input())
            .field("validation", self.controller.validation())
            .field("date_range", &self.date_range)
            .field("loaded", &self.result.as_ref().map(|r| r.samples.len()))
            .finish()
    }
}

impl BacktestViewer {
    /// Create a session talking to the HTTP backend named in `settings`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let provider = HttpBacktestProvider::from_settings(&settings);
        let today = chrono::Local::now().date_naive();
        Self::with_provider(settings, Box::new(provider), today)
    }

    /// Create a session with an explicit backend and "today".
    pub fn with_provider(
        settings: Settings,
        provider: Box<dyn BacktestProvider>,
        today: NaiveDate,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            backtest_service: BacktestService::from_settings(&settings),
            chart_service: ChartService::from_settings(&settings),
            controller: ValidationController::new(),
            date_range: DateRange::initial(today),
            result: None,
            provider,
            settings,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    // ── Ticker Input & Validation ───────────────────────────────────

    /// Replace the ticker text. Input is upper-cased; clearing it resets validation.
    pub fn set_ticker_input(&mut self, text: &str) {
        self.controller.set_input(text);
    }

    #[must_use]
    pub fn ticker_input(&self) -> &str {
        self.controller.input()
    }

    #[must_use]
    pub fn validation(&self) -> &TickerValidation {
        self.controller.validation()
    }

    /// Validation state as displayed next to the live input.
    #[must_use]
    pub fn validation_state(&self) -> ValidationState {
        self.controller.displayed_state()
    }

    #[must_use]
    pub fn validation_message(&self) -> &'static str {
        self.validation_state().message()
    }

    /// Whether the backtest action is available for the live input.
    #[must_use]
    pub fn can_run(&self) -> bool {
        self.controller.can_run()
    }

    /// Mark a lookup for the current input as pending and return the ticker
    /// to look up. Pair with [`Self::complete_validation`] when the response
    /// arrives; responses for superseded lookups are discarded there.
    pub fn begin_validation(&mut self) -> Option<String> {
        self.controller.begin()
    }

    /// Apply a ticker lookup response. A successful validation replaces the
    /// date range with the ticker's full history.
    pub fn complete_validation(&mut self, response: &TickerInfo) -> ValidationOutcome {
        let outcome = self.controller.apply(response);
        if let ValidationOutcome::Validated(bounds) = outcome {
            self.date_range = DateRange::from_bounds(bounds);
        }
        outcome
    }

    /// Record a transport failure of the lookup for `ticker`.
    pub fn fail_validation(&mut self, ticker: &str, error: &CoreError) {
        self.controller.fail(ticker, error);
    }

    /// Look up the current input and apply the response.
    /// Returns `Ok(None)` when the input is empty.
    pub async fn validate_ticker(&mut self) -> Result<Option<ValidationOutcome>, CoreError> {
        let Some(ticker) = self.begin_validation() else {
            return Ok(None);
        };
        match self.provider.get_ticker_info(&ticker).await {
            Ok(response) => Ok(Some(self.complete_validation(&response))),
            Err(e) => {
                self.fail_validation(&ticker, &e);
                Err(e)
            }
        }
    }

    // ── Date Range ──────────────────────────────────────────────────

    #[must_use]
    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn select_start_date(&mut self, date: NaiveDate) -> Result<(), CoreError> {
        self.date_range.select_start(date)
    }

    pub fn select_end_date(&mut self, date: NaiveDate) -> Result<(), CoreError> {
        self.date_range.select_end(date)
    }

    // ── Backtest ────────────────────────────────────────────────────

    /// Fetch the backtest for the validated ticker over the selected window.
    ///
    /// On any failure the previously loaded result stays in place untouched.
    pub async fn run_backtest(&mut self) -> Result<&BacktestResult, CoreError> {
        let ticker = match self.controller.validated() {
            Some((ticker, _)) => ticker.to_string(),
            None => {
                return Err(CoreError::NotValidated(format!(
                    "'{}' has not been validated",
                    self.controller.input()
                )))
            }
        };
        let range = self.date_range;

        match self
            .backtest_service
            .run(self.provider.as_ref(), &ticker, &range)
            .await
        {
            Ok(result) => Ok(&*self.result.insert(result)),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Backtest failed; keeping previous results");
                Err(e)
            }
        }
    }

    /// The last successfully loaded backtest.
    #[must_use]
    pub fn result(&self) -> Option<&BacktestResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn chart_data(&self) -> Option<ChartData> {
        self.result.as_ref().map(|r| self.chart_service.chart_data(r))
    }

    #[must_use]
    pub fn summary(&self) -> Option<ReturnSummary> {
        self.result.as_ref().and_then(|r| self.chart_service.summary(r))
    }

    #[must_use]
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        self.result
            .as_ref()
            .and_then(|r| self.chart_service.tooltip(r, index))
    }
}
