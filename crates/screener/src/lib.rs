//! Quartile equity screener
//!
//! Scores a batch of tickers on three groups of data retrieved from the
//! Financial Modeling Prep API and ranks them by the sum:
//!
//! - Quality/growth: twelve TTM and five-year ratios, each scored 1 to 4 by
//!   quartile within the batch
//! - ESG: environmental, social and governance scores, each scored -1, 0 or
//!   +1 by tercile
//! - Earnings surprise: mean and spread of the last twenty quarterly
//!   surprises, scored -2 to +2 and +1 to -1
//!
//! Thresholds are always relative to the tickers in the run. Missing data
//! counts as zero and is reported, never fatal.
//!
//! # Example
//!
//! ```rust,ignore
//! use screener::{Screener, ScreenerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ScreenerConfig::builder()
//!         .with_env()
//!         .tickers(["MSFT", "AAPL", "TSLA", "PFE"])
//!         .build()?;
//!
//!     let run = Screener::from_config(config)?.run().await;
//!     for row in &run.ranking.rows {
//!         println!("{} {}", row.ticker, row.total);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod combiner;
pub mod config;
pub mod error;
pub mod formatter;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod table;

// Re-export main types for convenience
pub use api::{FmpClient, MarketDataSource};
pub use combiner::{FinalScore, Ranking};
pub use config::{ConfigFile, ScreenerConfig};
pub use error::{Result, ScreenerError};
pub use formatter::{FormatOptions, Formatter, FormatterFactory, OutputFormat};
pub use pipeline::{Screener, ScreenerRun};
pub use report::{Outcome, RunReport, Stage, StageOutcome};
pub use table::{MetricTable, ScoreTable, Ticker};
