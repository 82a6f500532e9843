//! Backtest viewer CLI: terminal frontend over `backtest-viewer-core`.
//!
//! Commands:
//! - `validate`: check that a ticker exists and print its available history
//! - `run`: validate a ticker, fetch its backtest and print the results

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use backtest_viewer_core::models::chart::{ChartData, ReturnSummary, Tooltip};
use backtest_viewer_core::models::settings::Settings;
use backtest_viewer_core::services::time_codec::display_day;
use backtest_viewer_core::services::validation_controller::ValidationOutcome;
use backtest_viewer_core::BacktestViewer;

#[derive(Parser)]
#[command(
    name = "backtest-viewer",
    about = "Compare buy-and-hold with a predictive strategy's backtest"
)]
struct Cli {
    /// Path to a JSON settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the settings file).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a ticker exists and print the history available for it.
    Validate {
        /// Ticker symbol (compatible with Yahoo Finance).
        ticker: String,
    },
    /// Validate a ticker, run its backtest and print the results.
    Run {
        /// Ticker symbol (compatible with Yahoo Finance).
        ticker: String,

        /// Start date (YYYY-MM-DD). Defaults to the first day of history.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to the last day of history.
        #[arg(long)]
        end: Option<String>,

        /// Maximum number of chart points (overrides the settings file).
        #[arg(long)]
        max_points: Option<usize>,

        /// Print every chart point with its tooltip values.
        #[arg(long, default_value_t = false)]
        points: bool,

        /// Emit JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize)]
struct RunReport {
    summary: ReturnSummary,
    chart: ChartData,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    debug!(
        api_base_url = %settings.api_base_url,
        max_points = settings.max_chart_points,
        "Settings loaded"
    );
    Ok(settings)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Validate `ticker` and fail unless the backend confirmed it.
async fn validate(viewer: &mut BacktestViewer, ticker: &str) -> Result<()> {
    viewer.set_ticker_input(ticker);
    let outcome = viewer
        .validate_ticker()
        .await
        .context("ticker lookup failed")?;
    match outcome {
        Some(ValidationOutcome::Validated(_)) => Ok(()),
        Some(_) => bail!("{}: {}", viewer.ticker_input(), viewer.validation_message()),
        None => bail!("{}", viewer.validation_message()),
    }
}

fn print_summary(summary: &ReturnSummary, strategy_label: &str) {
    println!("Backtest Results");
    println!("Ticker:     {}", summary.ticker);
    println!("Start Date: {}", display_day(summary.start_date));
    println!("End Date:   {}", display_day(summary.end_date));
    println!();
    println!("Total Returns");
    println!(
        "  {}: {} [{}]",
        summary.ticker, summary.buy_and_hold_total, summary.buy_and_hold_total.color
    );
    println!(
        "  {}: {} [{}]",
        strategy_label, summary.strategy_total, summary.strategy_total.color
    );
    println!("  Signal accuracy: {}%", summary.signal_accuracy);
}

fn print_tooltip(tooltip: &Tooltip) {
    println!(
        "{:<32} {}: {} ({})  {}: {} ({})",
        tooltip.date,
        tooltip.buy_and_hold.key,
        tooltip.buy_and_hold.total,
        tooltip.buy_and_hold.period,
        tooltip.strategy.key,
        tooltip.strategy.total,
        tooltip.strategy.period,
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut settings = load_settings(&cli)?;

    match cli.command {
        Commands::Validate { ticker } => {
            let mut viewer = BacktestViewer::new(settings)?;
            validate(&mut viewer, &ticker).await?;
            let range = viewer.date_range();
            println!(
                "{}: {} History from {} to {}",
                viewer.ticker_input(),
                viewer.validation_message(),
                display_day(range.min_date),
                display_day(range.max_date)
            );
        }
        Commands::Run {
            ticker,
            start,
            end,
            max_points,
            points,
            json,
        } => {
            if let Some(max_points) = max_points {
                settings.max_chart_points = max_points;
            }
            let mut viewer = BacktestViewer::new(settings)?;
            validate(&mut viewer, &ticker).await?;

            if let Some(start) = start.as_deref() {
                viewer.select_start_date(parse_date(start)?)?;
            }
            if let Some(end) = end.as_deref() {
                viewer.select_end_date(parse_date(end)?)?;
            }

            let sample_count = viewer
                .run_backtest()
                .await
                .context("backtest failed")?
                .samples
                .len();

            let (Some(summary), Some(chart)) = (viewer.summary(), viewer.chart_data()) else {
                bail!("backtest returned no data");
            };

            if json {
                let report = RunReport { summary, chart };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&summary, &viewer.settings().strategy_label);
                if points {
                    println!();
                    for tooltip in (0..sample_count).filter_map(|i| viewer.tooltip(i)) {
                        print_tooltip(&tooltip);
                    }
                }
            }
        }
    }

    Ok(())
}
