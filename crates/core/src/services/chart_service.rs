use crate::models::chart::{ChartData, ChartPoint, ChartSeries, ReturnSummary, Tooltip, TooltipLine};
use crate::models::performance::{BacktestResult, PerformanceSample};
use crate::models::settings::Settings;
use crate::services::display_formatter::DisplayFormatter;

/// Generates chart-ready data sets from a backtest result.
///
/// Every figure a frontend renders is computed here:
/// - Cumulative buy-and-hold and strategy returns per sample
/// - The summary header (total returns, signal accuracy)
/// - Tooltip contents for any sample
pub struct ChartService {
    formatter: DisplayFormatter,
    strategy_label: String,
}

impl ChartService {
    pub fn new(formatter: DisplayFormatter, strategy_label: impl Into<String>) -> Self {
        Self {
            formatter,
            strategy_label: strategy_label.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            DisplayFormatter::from_settings(settings),
            settings.strategy_label.clone(),
        )
    }

    #[must_use]
    pub fn formatter(&self) -> &DisplayFormatter {
        &self.formatter
    }

    /// Two line series: the ticker's `changeTotal` and the strategy's `impliedTotal`.
    #[must_use]
    pub fn chart_data(&self, result: &BacktestResult) -> ChartData {
        let series = |key: &str, y: fn(&PerformanceSample) -> f64| ChartSeries {
            key: key.to_string(),
            points: result
                .samples
                .iter()
                .map(|s| ChartPoint {
                    date: s.date.clone(),
                    value: y(s),
                })
                .collect(),
        };

        ChartData {
            buy_and_hold: series(&result.ticker, |s| s.change_total),
            strategy: series(&self.strategy_label, |s| s.implied_total),
        }
    }

    /// Tooltip for the sample at `index`, or `None` past the end of the series.
    #[must_use]
    pub fn tooltip(&self, result: &BacktestResult, index: usize) -> Option<Tooltip> {
        let sample = result.samples.get(index)?;
        Some(Tooltip {
            date: sample.date.clone(),
            buy_and_hold: TooltipLine {
                key: result.ticker.clone(),
                total: self.formatter.format(sample.change_total),
                period: self.formatter.format(sample.change),
            },
            strategy: TooltipLine {
                key: self.strategy_label.clone(),
                total: self.formatter.format(sample.implied_total),
                period: self.formatter.format(sample.implied),
            },
        })
    }

    /// Header block: totals come from the last sample, accuracy from the
    /// full series counted before reduction.
    #[must_use]
    pub fn summary(&self, result: &BacktestResult) -> Option<ReturnSummary> {
        let last = result.last_sample()?;
        let accuracy = result.signals.accuracy().unwrap_or(0.0);

        Some(ReturnSummary {
            ticker: result.ticker.clone(),
            start_date: result.start_date,
            end_date: result.end_date,
            buy_and_hold_total: self.formatter.format(last.change_total),
            strategy_total: self.formatter.format(last.implied_total),
            signal_accuracy: self.formatter.round(accuracy),
        })
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
