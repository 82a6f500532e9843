use async_trait::async_trait;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::performance::PerformanceResponse;
use crate::models::settings::Settings;
use crate::models::ticker::TickerInfo;
use super::traits::BacktestProvider;

const PROVIDER_NAME: &str = "BacktestApi";

/// HTTP client for the backtest backend.
///
/// - `GET {base}/api/info/{ticker}` → ticker existence and history bounds
/// - `GET {base}/api/performance/{ticker}?startDate=..&endDate=..` → backtest series
///
/// The ticker is percent-encoded as a path segment, so symbols such as
/// `^VIX` or `CL=F` reach the backend intact.
pub struct HttpBacktestProvider {
    client: Client,
    base_url: String,
}

impl HttpBacktestProvider {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_base_url.clone(), settings.request_timeout_secs)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn info_url(&self, ticker: &str) -> String {
        format!("{}/api/info/{}", self.base_url, urlencoding::encode(ticker))
    }

    #[must_use]
    pub fn performance_url(&self, ticker: &str, start_epoch: i64, end_epoch: i64) -> String {
        format!(
            "{}/api/performance/{}?startDate={start_epoch}&endDate={end_epoch}",
            self.base_url,
            urlencoding::encode(ticker)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, CoreError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("{what} request failed with HTTP {status}"),
            });
        }
        resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse {what} response: {e}"),
        })
    }
}

impl Default for HttpBacktestProvider {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BacktestProvider for HttpBacktestProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_ticker_info(&self, ticker: &str) -> Result<TickerInfo, CoreError> {
        let url = self.info_url(ticker);
        debug!(ticker = %ticker, url = %url, "Requesting ticker info");
        self.get_json(&url, &format!("ticker info for {ticker}")).await
    }

    async fn get_performance(
        &self,
        ticker: &str,
        start_epoch: i64,
        end_epoch: i64,
    ) -> Result<PerformanceResponse, CoreError> {
        let url = self.performance_url(ticker, start_epoch, end_epoch);
        debug!(ticker = %ticker, start_epoch, end_epoch, "Requesting performance");
        self.get_json(&url, &format!("performance for {ticker}")).await
    }
}
