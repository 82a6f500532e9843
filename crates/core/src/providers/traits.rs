use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::performance::PerformanceResponse;
use crate::models::ticker::TickerInfo;

/// Trait abstraction for the backend that knows tickers and computes backtests.
///
/// The HTTP client implements it for the real service; tests and offline
/// frontends plug in their own implementation.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BacktestProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Look up whether a ticker exists and which days of history it has.
    async fn get_ticker_info(&self, ticker: &str) -> Result<TickerInfo, CoreError>;

    /// Fetch the backtest of `ticker` between two Unix epoch seconds.
    async fn get_performance(
        &self,
        ticker: &str,
        start_epoch: i64,
        end_epoch: i64,
    ) -> Result<PerformanceResponse, CoreError>;
}
