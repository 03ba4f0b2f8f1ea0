//! Command-line interface for the quartile screener
//!
//! ```bash
//! export FMP_API_KEY=...
//! cargo run -p screener-cli -- MSFT AAPL TSLA PFE
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use screener::{FormatOptions, FormatterFactory, OutputFormat, Screener, ScreenerConfig};
use screener_utils::{LogFormat, LoggingConfig};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "screener-cli")]
#[command(about = "Rank stocks by quality/growth, ESG and earnings surprise", long_about = None)]
struct Args {
    /// Tickers to screen (space or comma separated); defaults to MSFT AAPL TSLA PFE
    #[arg(value_delimiter = ',')]
    tickers: Vec<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Financial Modeling Prep API key (overrides FMP_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// API host (overrides FMP_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Client-side request budget per minute
    #[arg(long)]
    requests_per_minute: Option<u32>,

    /// Quarters used for earnings surprise statistics
    #[arg(long)]
    earnings_window: Option<usize>,

    /// Usable quarters required for earnings surprise statistics (default 1)
    #[arg(long)]
    min_quarters: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Table)]
    format: FormatArg,

    /// Also print the raw metric tables
    #[arg(long)]
    show_metrics: bool,

    /// Do not print failed or partial stages
    #[arg(long)]
    hide_issues: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn logging(&self) -> LoggingConfig {
        let format = if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };
        LoggingConfig::from_verbosity(self.verbose).with_format(format)
    }

    fn format_options(&self) -> FormatOptions {
        FormatOptions {
            show_metrics: self.show_metrics,
            show_issues: !self.hide_issues,
        }
    }

    /// Defaults, then config file, then environment, then flags
    fn screener_config(&self) -> anyhow::Result<ScreenerConfig> {
        let mut builder = ScreenerConfig::builder();

        if let Some(path) = &self.config {
            builder = builder
                .with_file_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
        }

        builder = builder.with_env();

        if !self.tickers.is_empty() {
            builder = builder.tickers(self.tickers.iter().cloned());
        }
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key.clone());
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(secs) = self.timeout {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(rpm) = self.requests_per_minute {
            builder = builder.requests_per_minute(rpm);
        }
        if let Some(window) = self.earnings_window {
            builder = builder.earnings_window(window);
        }
        if let Some(min) = self.min_quarters {
            builder = builder.min_earnings_quarters(min);
        }

        Ok(builder.build()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    screener_utils::init_tracing_with(&args.logging());

    let config = args.screener_config().context("invalid configuration")?;
    info!(tickers = ?config.tickers, "Starting screener-cli");

    let screener = Screener::from_config(config)?;
    let run = screener.run().await;

    let formatter = FormatterFactory::create(args.format.into());
    let output = formatter.format_run(&run, args.format_options())?;
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tickers_and_flags() {
        let args = Args::try_parse_from([
            "screener-cli",
            "msft,aapl",
            "pfe",
            "--api-key",
            "k",
            "--format",
            "json",
            "--min-quarters",
            "12",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.tickers, vec!["msft", "aapl", "pfe"]);
        assert_eq!(args.format, FormatArg::Json);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.logging().default_filter, "trace");

        let config = args.screener_config().unwrap();
        let symbols: Vec<_> = config.tickers.iter().map(|t| t.as_str()).collect();
        assert_eq!(symbols, vec!["MSFT", "AAPL", "PFE"]);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.min_earnings_quarters, 12);
    }

    #[test]
    fn test_default_format_options() {
        let args = Args::try_parse_from(["screener-cli"]).unwrap();
        let options = args.format_options();
        assert!(options.show_issues);
        assert!(!options.show_metrics);
        assert_eq!(OutputFormat::from(args.format), OutputFormat::Table);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let args = Args::try_parse_from(["screener-cli", "--api-key", "k", "--min-quarters", "0"])
            .unwrap();
        assert!(args.screener_config().is_err());
    }
}
