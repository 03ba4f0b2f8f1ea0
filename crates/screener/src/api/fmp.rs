//! Financial Modeling Prep API client

use crate::api::models::{EarningsSurprise, EsgScores, FinancialGrowth, KeyMetricsTtm, RatiosTtm};
use crate::config::{ScreenerConfig, backoff_delay};
use crate::error::{Result, ScreenerError};
use crate::table::Ticker;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const PROVIDER: &str = "Financial Modeling Prep";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Provider endpoint, one per metric group request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    RatiosTtm,
    KeyMetricsTtm,
    FinancialGrowth,
    Esg,
    EarningsSurprises,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::RatiosTtm => "ratios-ttm",
            Endpoint::KeyMetricsTtm => "key-metrics-ttm",
            Endpoint::FinancialGrowth => "financial-growth",
            Endpoint::Esg => "esg-environmental-social-governance-data",
            Endpoint::EarningsSurprises => "earnings-surprises",
        }
    }

    /// Build the request URL, API key excluded
    ///
    /// The ESG endpoint takes the symbol as a query parameter, the others as
    /// the last path segment.
    fn url(&self, base: &Url, ticker: &Ticker) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ScreenerError::ConfigError(format!("base URL cannot have a path: {base}"))
            })?;
            segments.pop_if_empty();
            match self {
                Endpoint::Esg => {
                    segments.extend(["api", "v4", self.name()]);
                }
                _ => {
                    segments.extend(["api", "v3", self.name(), ticker.as_str()]);
                }
            }
        }

        if *self == Endpoint::Esg {
            url.query_pairs_mut().append_pair("symbol", ticker.as_str());
        }

        Ok(url)
    }
}

/// Financial Modeling Prep API client
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    base_url: Url,
    api_key: String,
    rate_limiter: SharedRateLimiter,
    max_attempts: u32,
    retry_backoff_base: Duration,
}

impl FmpClient {
    /// Create a client from a validated configuration
    pub fn new(config: &ScreenerConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ScreenerError::ConfigError("API key required".to_string()))?;

        let client = Client::builder().timeout(config.request_timeout).build()?;

        let quota = Quota::per_minute(
            NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            api_key,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            max_attempts: config.max_retries.max(1),
            retry_backoff_base: config.retry_backoff_base,
        })
    }

    /// Fetch the raw JSON body of an endpoint, retrying transient failures
    pub async fn get_json(&self, endpoint: Endpoint, ticker: &Ticker) -> Result<Value> {
        let mut url = endpoint.url(&self.base_url, ticker)?;
        url.query_pairs_mut().append_pair("apikey", &self.api_key);

        let mut attempt = 0;
        loop {
            // Wait for rate limiter
            self.rate_limiter.until_ready().await;

            debug!(endpoint = endpoint.name(), %ticker, attempt, "requesting");

            match self.send(endpoint, url.clone()).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_transient() && attempt + 1 < self.max_attempts => {
                    let delay = backoff_delay(self.retry_backoff_base, attempt);
                    warn!(
                        endpoint = endpoint.name(),
                        %ticker,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, endpoint: Endpoint, url: Url) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScreenerError::RateLimitExceeded {
                provider: PROVIDER.to_string(),
            });
        }

        if !status.is_success() {
            // Authentication failures carry an explanation in the body
            let body = response.text().await.unwrap_or_default();
            let data = serde_json::from_str(&body).unwrap_or(Value::Null);
            if let Some(message) = error_message(&data) {
                return Err(ScreenerError::ApiError(message));
            }
            return Err(ScreenerError::HttpStatus {
                endpoint: endpoint.name().to_string(),
                status: status.as_u16(),
            });
        }

        let data: Value = response.json().await?;

        // Check for API error messages
        if let Some(message) = error_message(&data) {
            return Err(ScreenerError::ApiError(message));
        }

        Ok(data)
    }

    /// Fetch an endpoint and decode its array of records
    pub async fn get_records<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        ticker: &Ticker,
    ) -> Result<Vec<T>> {
        let data = self.get_json(endpoint, ticker).await?;

        if !data.is_array() {
            return Err(ScreenerError::MalformedData {
                symbol: ticker.to_string(),
                reason: format!("{} did not return a JSON array", endpoint.name()),
            });
        }

        Ok(serde_json::from_value(data)?)
    }

    /// Fetch an endpoint and keep its first record
    pub async fn get_first<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        ticker: &Ticker,
    ) -> Result<T> {
        self.get_records(endpoint, ticker)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScreenerError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("{} returned no records", endpoint.name()),
            })
    }

    /// Trailing twelve month profitability ratios
    pub async fn ratios_ttm(&self, ticker: &Ticker) -> Result<RatiosTtm> {
        self.get_first(Endpoint::RatiosTtm, ticker).await
    }

    /// Trailing twelve month balance sheet and cash flow metrics
    pub async fn key_metrics_ttm(&self, ticker: &Ticker) -> Result<KeyMetricsTtm> {
        self.get_first(Endpoint::KeyMetricsTtm, ticker).await
    }

    /// Most recent annual growth record
    pub async fn financial_growth(&self, ticker: &Ticker) -> Result<FinancialGrowth> {
        self.get_first(Endpoint::FinancialGrowth, ticker).await
    }

    /// Most recent ESG rating
    pub async fn esg_scores(&self, ticker: &Ticker) -> Result<EsgScores> {
        self.get_first(Endpoint::Esg, ticker).await
    }

    /// Every reported quarter with its consensus estimate
    pub async fn earnings_surprises(&self, ticker: &Ticker) -> Result<Vec<EarningsSurprise>> {
        let quarters: Vec<EarningsSurprise> =
            self.get_records(Endpoint::EarningsSurprises, ticker).await?;

        if quarters.is_empty() {
            return Err(ScreenerError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "no reported quarters".to_string(),
            });
        }

        Ok(quarters)
    }
}

/// Extract the provider's `"Error Message"` field, if any
fn error_message(data: &Value) -> Option<String> {
    data.get("Error Message").map(|message| match message.as_str() {
        Some(text) => text.to_string(),
        None => message.to_string(),
    })
}
