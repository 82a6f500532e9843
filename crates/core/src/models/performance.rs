use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of a backtest, as returned by the performance endpoint.
///
/// All return figures are percentages. Samples arrive ordered by ascending
/// `date` and are never modified after they are received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    /// Calendar day identifier, kept exactly as the backend rendered it
    pub date: String,

    /// Period return of holding the underlying instrument
    pub change: f64,

    /// Cumulative buy-and-hold return since the first sample
    pub change_total: f64,

    /// Period return of the predictive strategy
    pub implied: f64,

    /// Cumulative strategy return since the first sample
    pub implied_total: f64,

    /// Whether the strategy signalled a position this period
    pub prediction: bool,

    /// Whether an oracle strategy would have held a position this period
    pub target: bool,
}

/// Envelope of `GET /api/performance/{ticker}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub success: bool,

    #[serde(default)]
    pub result: Vec<PerformanceSample>,
}

/// A finished backtest, snapshotted with the ticker and window that produced it.
///
/// Later edits to the ticker input or the date pickers do not touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Reduced series, first and last sample of the response included
    pub samples: Vec<PerformanceSample>,

    /// Prediction hits counted over the full response, before reduction
    pub signals: SignalStats,
}

/// How many samples of a backtest had `prediction == target`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalStats {
    pub matches: usize,
    pub total: usize,
}

impl SignalStats {
    pub fn from_samples(samples: &[PerformanceSample]) -> Self {
        Self {
            matches: samples.iter().filter(|s| s.prediction == s.target).count(),
            total: samples.len(),
        }
    }

    /// Percentage of matching samples, or `None` when there were none at all.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| self.matches as f64 / self.total as f64 * 100.0)
    }
}

impl BacktestResult {
    /// Sample holding the final cumulative totals.
    #[must_use]
    pub fn last_sample(&self) -> Option<&PerformanceSample> {
        self.samples.last()
    }
}
