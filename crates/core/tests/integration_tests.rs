// ═══════════════════════════════════════════════════════════════════
// Integration Tests — full BacktestViewer sessions against a scripted
// backend: validation, date selection, runs and result snapshots
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use backtest_viewer_core::errors::CoreError;
use backtest_viewer_core::models::performance::{PerformanceResponse, PerformanceSample};
use backtest_viewer_core::models::settings::Settings;
use backtest_viewer_core::models::ticker::{DateBounds, TickerInfo, TickerValidation, ValidationState};
use backtest_viewer_core::providers::traits::BacktestProvider;
use backtest_viewer_core::services::validation_controller::ValidationOutcome;
use backtest_viewer_core::BacktestViewer;

// ═══════════════════════════════════════════════════════════════════
// Scripted Backend (for testing without a real server)
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct BackendState {
    /// Known tickers → (minDate, maxDate) wire strings
    tickers: HashMap<String, (String, String)>,
    /// Performance series per ticker
    series: HashMap<String, Vec<PerformanceSample>>,
    /// When set, the performance endpoint answers `success: false`
    fail_performance: bool,
    /// When set, ticker lookups fail in transport
    fail_lookup: bool,
    performance_calls: Vec<(String, i64, i64)>,
}

#[derive(Clone, Default)]
struct ScriptedBackend {
    state: Arc<Mutex<BackendState>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            state.tickers.insert(
                "AAPL".into(),
                (
                    "Sun, 01 Jan 2023 00:00:00 GMT".into(),
                    "Thu, 01 Jun 2023 00:00:00 GMT".into(),
                ),
            );
            state.tickers.insert(
                "MSFT".into(),
                (
                    "Mon, 02 Jan 2023 00:00:00 GMT".into(),
                    "Fri, 30 Jun 2023 00:00:00 GMT".into(),
                ),
            );
            state.series.insert("AAPL".into(), growing_series(30, 1.0, 0.5));
            state.series.insert("MSFT".into(), growing_series(3000, -0.01, 0.02));
        }
        backend
    }

    fn set_fail_performance(&self, fail: bool) {
        self.state.lock().unwrap().fail_performance = fail;
    }

    fn set_fail_lookup(&self, fail: bool) {
        self.state.lock().unwrap().fail_lookup = fail;
    }

    fn set_series(&self, ticker: &str, samples: Vec<PerformanceSample>) {
        self.state
            .lock()
            .unwrap()
            .series
            .insert(ticker.to_string(), samples);
    }

    fn performance_calls(&self) -> Vec<(String, i64, i64)> {
        self.state.lock().unwrap().performance_calls.clone()
    }

    fn info_for(&self, ticker: &str) -> TickerInfo {
        let state = self.state.lock().unwrap();
        match state.tickers.get(ticker) {
            Some((min, max)) => TickerInfo {
                ticker: ticker.to_string(),
                exists: true,
                min_date: Some(min.clone()),
                max_date: Some(max.clone()),
            },
            None => TickerInfo {
                ticker: ticker.to_string(),
                exists: false,
                min_date: None,
                max_date: None,
            },
        }
    }
}

#[async_trait]
impl BacktestProvider for ScriptedBackend {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn get_ticker_info(&self, ticker: &str) -> Result<TickerInfo, CoreError> {
        if self.state.lock().unwrap().fail_lookup {
            return Err(CoreError::Network("connection reset".into()));
        }
        Ok(self.info_for(ticker))
    }

    async fn get_performance(
        &self,
        ticker: &str,
        start_epoch: i64,
        end_epoch: i64,
    ) -> Result<PerformanceResponse, CoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .performance_calls
            .push((ticker.to_string(), start_epoch, end_epoch));
        if state.fail_performance {
            return Ok(PerformanceResponse {
                success: false,
                result: vec![],
            });
        }
        Ok(PerformanceResponse {
            success: true,
            result: state.series.get(ticker).cloned().unwrap_or_default(),
        })
    }
}

/// Series whose cumulative totals grow linearly by `step_change`/`step_implied`.
fn growing_series(n: usize, step_change: f64, step_implied: f64) -> Vec<PerformanceSample> {
    (0..n)
        .map(|i| PerformanceSample {
            date: format!("2023-01-{:02}", i % 28 + 1),
            change: step_change,
            change_total: step_change * i as f64,
            implied: step_implied,
            implied_total: step_implied * i as f64,
            prediction: i % 2 == 0,
            target: true,
        })
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 10, 19)
}

fn viewer(backend: &ScriptedBackend) -> BacktestViewer {
    BacktestViewer::with_provider(Settings::default(), Box::new(backend.clone()), today()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Session setup
// ═══════════════════════════════════════════════════════════════════

#[test]
fn new_session_starts_with_initial_window() {
    let backend = ScriptedBackend::new();
    let v = viewer(&backend);
    let range = v.date_range();
    assert_eq!(range.start_date, today());
    assert_eq!(range.end_date, date(2026, 10, 20));
    assert_eq!(v.ticker_input(), "");
    assert_eq!(v.validation_state(), ValidationState::None);
    assert!(!v.can_run());
    assert!(v.result().is_none());
    assert!(v.summary().is_none());
    assert!(v.chart_data().is_none());
    assert_eq!(v.provider_name(), "Scripted");
}

#[test]
fn invalid_settings_are_rejected() {
    let backend = ScriptedBackend::new();
    let settings = Settings {
        max_chart_points: 0,
        ..Settings::default()
    };
    let err = BacktestViewer::with_provider(settings, Box::new(backend), today()).unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
}

#[test]
fn debug_output_names_provider_and_input() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("aapl");
    let debug = format!("{v:?}");
    assert!(debug.contains("Scripted"));
    assert!(debug.contains("AAPL"));
}

// ═══════════════════════════════════════════════════════════════════
// Ticker validation
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn validating_sets_range_to_ticker_bounds() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");

    let outcome = v.validate_ticker().await.unwrap();
    assert!(matches!(outcome, Some(ValidationOutcome::Validated(_))));

    let range = v.date_range();
    assert_eq!(range.start_date, date(2023, 1, 1));
    assert_eq!(range.end_date, date(2023, 6, 1));
    assert_eq!(range.min_date, date(2023, 1, 1));
    assert_eq!(range.max_date, date(2023, 6, 1));
    assert_eq!(v.validation_state(), ValidationState::Success);
    assert_eq!(v.validation_message(), "Valid ticker.");
    assert!(v.can_run());
}

#[tokio::test]
async fn editing_ticker_after_validation_disables_run() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    v.validate_ticker().await.unwrap();
    assert!(v.can_run());

    v.set_ticker_input("AAPL2");
    assert!(!v.can_run());
    assert_eq!(
        v.validation(),
        &TickerValidation::Valid {
            ticker: "AAPL".into(),
            bounds: DateBounds {
                min: date(2023, 1, 1),
                max: date(2023, 6, 1),
            },
        }
    );
    assert_eq!(v.validation().state(), ValidationState::Success);
    assert_eq!(v.validation_state(), ValidationState::None);

    let err = v.run_backtest().await.unwrap_err();
    assert!(matches!(err, CoreError::NotValidated(_)));
    assert!(backend.performance_calls().is_empty());
}

#[tokio::test]
async fn unknown_ticker_is_an_error_state() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("ZZZZ");
    let outcome = v.validate_ticker().await.unwrap();
    assert_eq!(outcome, Some(ValidationOutcome::Rejected));
    assert_eq!(v.validation_state(), ValidationState::Error);
    assert_eq!(v.validation_message(), "Enter a valid ticker.");
    assert_eq!(v.date_range().start_date, today());
    assert!(!v.can_run());
}

#[tokio::test]
async fn empty_input_is_not_looked_up() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    assert_eq!(v.validate_ticker().await.unwrap(), None);
    assert_eq!(v.validation_state(), ValidationState::None);
}

#[tokio::test]
async fn failed_lookup_keeps_previous_validation() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    v.validate_ticker().await.unwrap();

    backend.set_fail_lookup(true);
    let err = v.validate_ticker().await.unwrap_err();
    assert!(matches!(err, CoreError::Network(_)));
    assert_eq!(v.validation_state(), ValidationState::Success);
    assert!(v.can_run());
}

#[test]
fn stale_lookup_response_is_discarded() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);

    v.set_ticker_input("AAPL");
    let first = v.begin_validation().unwrap();
    v.set_ticker_input("MSFT");
    let second = v.begin_validation().unwrap();
    assert_eq!(v.validation_state(), ValidationState::Pending);

    // AAPL's response arrives after the user moved on to MSFT
    let outcome = v.complete_validation(&backend.info_for(&first));
    assert_eq!(outcome, ValidationOutcome::Stale);
    assert_eq!(v.validation_state(), ValidationState::Pending);
    assert_eq!(v.date_range().start_date, today());
    assert!(!v.can_run());

    let outcome = v.complete_validation(&backend.info_for(&second));
    assert!(matches!(outcome, ValidationOutcome::Validated(_)));
    assert_eq!(v.date_range().start_date, date(2023, 1, 2));
    assert_eq!(v.date_range().end_date, date(2023, 6, 30));
    assert!(v.can_run());
}

#[test]
fn failure_of_superseded_lookup_is_ignored() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    let first = v.begin_validation().unwrap();
    v.set_ticker_input("MSFT");
    v.begin_validation();

    v.fail_validation(&first, &CoreError::Network("timeout".into()));
    assert_eq!(
        v.validation(),
        &TickerValidation::Pending {
            ticker: "MSFT".into()
        }
    );
}

// ═══════════════════════════════════════════════════════════════════
// Backtest runs
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn run_uses_selected_window() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    v.validate_ticker().await.unwrap();
    v.select_start_date(date(2023, 2, 1)).unwrap();
    v.select_end_date(date(2023, 3, 1)).unwrap();

    let result = v.run_backtest().await.unwrap();
    assert_eq!(result.ticker, "AAPL");
    assert_eq!(result.start_date, date(2023, 2, 1));
    assert_eq!(result.end_date, date(2023, 3, 1));
    assert_eq!(result.samples.len(), 30);

    // 2023-02-01 and 2023-03-01 at 00:00 GMT
    assert_eq!(
        backend.performance_calls(),
        vec![("AAPL".to_string(), 1_675_209_600, 1_677_628_800)]
    );
}

#[tokio::test]
async fn rejected_date_pick_leaves_range_alone() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    v.validate_ticker().await.unwrap();
    let before = *v.date_range();

    assert!(v.select_start_date(date(2022, 12, 1)).is_err());
    assert!(v.select_end_date(date(2023, 7, 1)).is_err());
    assert_eq!(*v.date_range(), before);
}

#[tokio::test]
async fn long_series_is_reduced_with_endpoints() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("MSFT");
    v.validate_ticker().await.unwrap();

    let full = growing_series(3000, -0.01, 0.02);
    let result = v.run_backtest().await.unwrap();
    assert!(result.samples.len() <= 1002);
    assert_eq!(result.samples.first(), full.first());
    assert_eq!(result.samples.last(), full.last());
}

#[tokio::test]
async fn failed_run_keeps_previous_results() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    v.validate_ticker().await.unwrap();
    v.run_backtest().await.unwrap();
    let before = v.result().cloned().unwrap();
    let summary_before = v.summary();

    backend.set_fail_performance(true);
    v.select_start_date(date(2023, 3, 1)).unwrap();
    let err = v.run_backtest().await.unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }));

    assert_eq!(v.result(), Some(&before));
    assert_eq!(v.summary(), summary_before);
    assert_eq!(backend.performance_calls().len(), 2);
}

#[tokio::test]
async fn results_are_snapshotted() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    v.validate_ticker().await.unwrap();
    v.run_backtest().await.unwrap();

    v.set_ticker_input("MSFT");
    v.validate_ticker().await.unwrap();
    v.select_start_date(date(2023, 4, 3)).unwrap();

    let summary = v.summary().unwrap();
    assert_eq!(summary.ticker, "AAPL");
    assert_eq!(summary.start_date, date(2023, 1, 1));
    assert_eq!(summary.end_date, date(2023, 6, 1));
    assert_eq!(v.chart_data().unwrap().buy_and_hold.key, "AAPL");
}

#[tokio::test]
async fn summary_chart_and_tooltips_share_formatting() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("AAPL");
    v.validate_ticker().await.unwrap();
    v.run_backtest().await.unwrap();

    let summary = v.summary().unwrap();
    // 29 steps of +1.0 and +0.5
    assert_eq!(summary.buy_and_hold_total.value, 29.0);
    assert_eq!(summary.buy_and_hold_total.color, "green");
    assert_eq!(summary.strategy_total.value, 14.5);
    assert_eq!(summary.signal_accuracy, 50.0);

    let chart = v.chart_data().unwrap();
    assert_eq!(chart.buy_and_hold.points.len(), 30);
    assert_eq!(chart.strategy.key, "LSTM Bot");

    let last = v.tooltip(29).unwrap();
    assert_eq!(last.buy_and_hold.total, summary.buy_and_hold_total);
    assert_eq!(last.strategy.total, summary.strategy_total);
    assert_eq!(last.buy_and_hold.period.value, 1.0);
    assert_eq!(last.strategy.period.value, 0.5);
    assert!(v.tooltip(30).is_none());
}

#[tokio::test]
async fn negative_totals_are_coloured_negative() {
    let backend = ScriptedBackend::new();
    let mut v = viewer(&backend);
    v.set_ticker_input("MSFT");
    v.validate_ticker().await.unwrap();
    v.run_backtest().await.unwrap();

    let summary = v.summary().unwrap();
    // -0.01 × 2999
    assert_eq!(summary.buy_and_hold_total.value, -29.99);
    assert_eq!(summary.buy_and_hold_total.color, "red");
    assert_eq!(summary.strategy_total.color, "green");
}

#[tokio::test]
async fn signal_accuracy_covers_the_whole_backtest() {
    let backend = ScriptedBackend::new();
    // Hits fall exactly on the points the reducer keeps
    let samples = growing_series(3000, 0.1, 0.1)
        .into_iter()
        .enumerate()
        .map(|(i, s)| PerformanceSample {
            prediction: true,
            target: i % 4 == 0,
            ..s
        })
        .collect();
    backend.set_series("MSFT", samples);

    let mut v = viewer(&backend);
    v.set_ticker_input("MSFT");
    v.validate_ticker().await.unwrap();
    let kept = v.run_backtest().await.unwrap().samples.len();
    assert!(kept < 3000);

    assert_eq!(v.summary().unwrap().signal_accuracy, 25.0);
}
