use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::performance::{BacktestResult, SignalStats};
use crate::models::settings::Settings;
use crate::providers::traits::BacktestProvider;
use crate::services::{series_reducer, time_codec};

/// Runs a backtest against the backend and shapes the response for the chart.
///
/// 1. Convert the window to wire dates, then to epoch seconds
/// 2. Fetch the performance series
/// 3. Count prediction hits over the full series
/// 4. Reduce it to at most `max_points` (plus the protected endpoints)
/// 5. Snapshot it with the ticker and window that produced it
pub struct BacktestService {
    max_points: usize,
}

impl BacktestService {
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points: max_points.max(1),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.max_chart_points)
    }

    #[must_use]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Fetch and reduce the backtest of `ticker` over `range`.
    ///
    /// A response with `success: false`, or one without any samples, is an
    /// error: there is nothing to replace the previous chart with.
    pub async fn run(
        &self,
        provider: &dyn BacktestProvider,
        ticker: &str,
        range: &DateRange,
    ) -> Result<BacktestResult, CoreError> {
        if !range.is_consistent() {
            return Err(CoreError::InvalidDateRange(format!(
                "{} → {} is outside {} → {}",
                range.start_date, range.end_date, range.min_date, range.max_date
            )));
        }

        let start_epoch = time_codec::day_to_epoch_seconds(range.start_date)?;
        let end_epoch = time_codec::day_to_epoch_seconds(range.end_date)?;
        debug!(ticker = %ticker, start_epoch, end_epoch, "Running backtest");

        let response = provider
            .get_performance(ticker, start_epoch, end_epoch)
            .await?;

        if !response.success {
            return Err(CoreError::Api {
                provider: provider.name().to_string(),
                message: format!("backtest for {ticker} reported failure"),
            });
        }
        if response.result.is_empty() {
            return Err(CoreError::Api {
                provider: provider.name().to_string(),
                message: format!("backtest for {ticker} returned no samples"),
            });
        }

        let signals = SignalStats::from_samples(&response.result);
        let samples = series_reducer::reduce(&response.result, self.max_points);
        info!(
            ticker = %ticker,
            received = response.result.len(),
            kept = samples.len(),
            "Backtest loaded"
        );

        Ok(BacktestResult {
            ticker: ticker.to_string(),
            start_date: range.start_date,
            end_date: range.end_date,
            samples,
            signals,
        })
    }
}

impl Default for BacktestService {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
