//! Configuration for screener runs
//!
//! Values are layered, lowest precedence first: built-in defaults, a JSON
//! config file, environment variables, then explicit builder calls (the CLI
//! flags).

use crate::error::{Result, ScreenerError};
use crate::table::{Ticker, parse_tickers};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default Financial Modeling Prep host
pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com";

/// Tickers screened when none are configured
pub const DEFAULT_TICKERS: [&str; 4] = ["MSFT", "AAPL", "TSLA", "PFE"];

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "FMP_API_KEY";
/// Environment variable overriding the API host
pub const ENV_BASE_URL: &str = "FMP_BASE_URL";
/// Environment variable holding a comma separated ticker list
pub const ENV_TICKERS: &str = "SCREENER_TICKERS";

/// Configuration for a screener run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Financial Modeling Prep API key
    pub api_key: Option<String>,

    /// API host, without trailing path
    pub base_url: String,

    /// Tickers to screen, normalised and de-duplicated
    pub tickers: Vec<Ticker>,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Maximum number of attempts per request
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Client-side request budget
    pub requests_per_minute: u32,

    /// Number of most recent quarters used for earnings surprise statistics
    pub earnings_window: usize,

    /// Valid quarters needed for the statistics to be computed
    pub min_earnings_quarters: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            tickers: Vec::new(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            requests_per_minute: 300,
            earnings_window: 20,    // 5 years of quarters
            min_earnings_quarters: 1,
        }
    }
}

impl ScreenerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ScreenerConfigBuilder {
        ScreenerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(ScreenerError::ConfigError(format!(
                    "API key required (set {ENV_API_KEY} or pass --api-key)"
                )));
            }
        }

        if self.tickers.is_empty() {
            return Err(ScreenerError::ConfigError(
                "at least one ticker is required".to_string(),
            ));
        }

        url::Url::parse(&self.base_url)?;

        if self.max_retries == 0 {
            return Err(ScreenerError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(ScreenerError::ConfigError(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.min_earnings_quarters == 0 || self.min_earnings_quarters > self.earnings_window {
            return Err(ScreenerError::ConfigError(format!(
                "min_earnings_quarters must be between 1 and earnings_window ({})",
                self.earnings_window
            )));
        }

        Ok(())
    }

    /// Get retry backoff duration for attempt number
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        backoff_delay(self.retry_backoff_base, attempt)
    }
}

/// Exponential backoff: `base * 2^attempt`, saturating
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt))
}

/// On-disk configuration, every field optional
///
/// ```json
/// {
///   "apiKey": "...",
///   "tickers": ["MSFT", "AAPL", "TSLA", "PFE"],
///   "timeoutSecs": 30,
///   "maxRetries": 3,
///   "requestsPerMinute": 300,
///   "earningsWindow": 20,
///   "minEarningsQuarters": 12
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub tickers: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub requests_per_minute: Option<u32>,
    pub earnings_window: Option<usize>,
    pub min_earnings_quarters: Option<usize>,
}

impl ConfigFile {
    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&raw).map_err(|e| {
            ScreenerError::ConfigError(format!(
                "invalid config file {}: {e}",
                path.as_ref().display()
            ))
        })
    }
}

/// Builder for ScreenerConfig
#[derive(Debug, Default)]
pub struct ScreenerConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    tickers: Option<Vec<String>>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    requests_per_minute: Option<u32>,
    earnings_window: Option<usize>,
    min_earnings_quarters: Option<usize>,
}

impl ScreenerConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API host
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the tickers to screen
    pub fn tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = Some(tickers.into_iter().map(Into::into).collect());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the client-side request budget
    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = Some(rpm);
        self
    }

    /// Set the number of quarters used for earnings surprise statistics
    pub fn earnings_window(mut self, quarters: usize) -> Self {
        self.earnings_window = Some(quarters);
        self
    }

    /// Set the minimum number of quarters required
    pub fn min_earnings_quarters(mut self, quarters: usize) -> Self {
        self.min_earnings_quarters = Some(quarters);
        self
    }

    /// Apply every field present in a config file
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        if let Some(key) = file.api_key {
            self.api_key = Some(key);
        }
        if let Some(url) = file.base_url {
            self.base_url = Some(url);
        }
        if let Some(tickers) = file.tickers {
            self.tickers = Some(tickers);
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(retries) = file.max_retries {
            self.max_retries = Some(retries);
        }
        if let Some(ms) = file.retry_backoff_ms {
            self.retry_backoff_base = Some(Duration::from_millis(ms));
        }
        if let Some(rpm) = file.requests_per_minute {
            self.requests_per_minute = Some(rpm);
        }
        if let Some(window) = file.earnings_window {
            self.earnings_window = Some(window);
        }
        if let Some(min) = file.min_earnings_quarters {
            self.min_earnings_quarters = Some(min);
        }
        self
    }

    /// Load and apply a JSON config file
    pub fn with_file_path(self, path: impl AsRef<Path>) -> Result<Self> {
        Ok(self.with_file(ConfigFile::load(path)?))
    }

    /// Load API key, host and tickers from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Load API key, host and tickers through a variable lookup
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = Some(url);
        }
        if let Some(list) = lookup(ENV_TICKERS) {
            let tickers: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !tickers.is_empty() {
                self.tickers = Some(tickers);
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ScreenerConfig> {
        let defaults = ScreenerConfig::default();

        let raw_tickers = self
            .tickers
            .unwrap_or_else(|| DEFAULT_TICKERS.iter().map(|s| (*s).to_string()).collect());

        let config = ScreenerConfig {
            api_key: self.api_key,
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            tickers: parse_tickers(&raw_tickers)?,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
            earnings_window: self.earnings_window.unwrap_or(defaults.earnings_window),
            min_earnings_quarters: self
                .min_earnings_quarters
                .unwrap_or(defaults.min_earnings_quarters),
        };

        config.validate()?;
        Ok(config)
    }
}
