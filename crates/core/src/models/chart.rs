use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rounded return figure together with the colour it is shown in.
///
/// The core decides both. The frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedReturn {
    /// Rounded percentage
    pub value: f64,

    /// Presentation colour picked from the value's sign
    pub color: String,
}

impl fmt::Display for FormattedReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.value)
    }
}

/// A single point of a line series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}

/// One named line of the performance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Legend key (the ticker, or the strategy label)
    pub key: String,
    pub points: Vec<ChartPoint>,
}

/// Both cumulative-return lines, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Buy-and-hold line (`changeTotal`)
    pub buy_and_hold: ChartSeries,

    /// Strategy line (`impliedTotal`)
    pub strategy: ChartSeries,
}

/// One line of a tooltip: cumulative return, then the period return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipLine {
    pub key: String,
    pub total: FormattedReturn,
    pub period: FormattedReturn,
}

/// Tooltip shown when hovering a chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub date: String,
    pub buy_and_hold: TooltipLine,
    pub strategy: TooltipLine,
}

/// Header block above the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Total buy-and-hold return over the window
    pub buy_and_hold_total: FormattedReturn,

    /// Total strategy return over the window
    pub strategy_total: FormattedReturn,

    /// Share of samples where the strategy signal matched the oracle, in percent
    pub signal_accuracy: f64,
}
