//! Error types for screener operations

use thiserror::Error;

/// Screener specific errors
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// The provider answered with an error payload
    #[error("API error: {0}")]
    ApiError(String),

    /// The provider answered with a non-success HTTP status
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus {
        endpoint: String,
        status: u16,
    },

    /// Invalid ticker symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Data was returned but could not be used
    #[error("Malformed data for {symbol}: {reason}")]
    MalformedData {
        symbol: String,
        reason: String,
    },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// URL construction error
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filesystem error while loading configuration
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScreenerError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ScreenerError::NetworkError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ScreenerError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            ScreenerError::RateLimitExceeded { .. } => true,
            _ => false,
        }
    }
}

/// Result type alias for screener operations
pub type Result<T> = std::result::Result<T, ScreenerError>;
