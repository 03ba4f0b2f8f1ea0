//! The screening run: fetch, assemble, score, combine
//!
//! Requests are issued one at a time, ticker by ticker, stage by stage. Data
//! retrieval failures never abort the run; see [`crate::report`].

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::api::{FmpClient, MarketDataSource};
use crate::combiner::{Ranking, combine};
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::metrics::{earnings, esg, quality_growth};
use crate::report::RunReport;
use crate::scoring;
use crate::table::{MetricTable, ScoreTable, Ticker};

/// Everything produced by one run
#[derive(Debug, Clone, Serialize)]
pub struct ScreenerRun {
    pub quality_growth: MetricTable,
    pub esg: MetricTable,
    pub earnings: MetricTable,
    pub quality_growth_scores: ScoreTable,
    pub esg_scores: ScoreTable,
    pub earnings_scores: ScoreTable,
    pub ranking: Ranking,
    pub report: RunReport,
}

/// Quartile screener over a market data source
pub struct Screener {
    source: Arc<dyn MarketDataSource>,
    config: Arc<ScreenerConfig>,
}

impl Screener {
    /// Create a screener over an arbitrary data source
    pub fn new(source: Arc<dyn MarketDataSource>, config: Arc<ScreenerConfig>) -> Self {
        Self { source, config }
    }

    /// Create a screener backed by the Financial Modeling Prep API
    pub fn from_config(config: ScreenerConfig) -> Result<Self> {
        config.validate()?;
        let client = FmpClient::new(&config)?;
        Ok(Self::new(Arc::new(client), Arc::new(config)))
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Screen the configured tickers
    pub async fn run(&self) -> ScreenerRun {
        self.run_for(&self.config.tickers).await
    }

    /// Screen an explicit ticker list
    pub async fn run_for(&self, tickers: &[Ticker]) -> ScreenerRun {
        info!(tickers = tickers.len(), "starting screener run");

        let source = self.source.as_ref();

        let qg = quality_growth::assemble(source, tickers).await;
        let esg = esg::assemble(source, tickers).await;
        let earnings = earnings::assemble(
            source,
            tickers,
            self.config.earnings_window,
            self.config.min_earnings_quarters,
        )
        .await;

        let quality_growth_scores = scoring::score_quality_growth(&qg.table);
        let esg_scores = scoring::score_esg(&esg.table);
        let earnings_scores = scoring::score_earnings(&earnings.table);

        let ranking = combine(&quality_growth_scores, &esg_scores, &earnings_scores);

        let mut report = qg.report;
        report.extend(esg.report);
        report.extend(earnings.report);

        info!(
            ranked = ranking.rows.len(),
            failures = report.failure_count(),
            "screener run complete"
        );

        ScreenerRun {
            quality_growth: qg.table,
            esg: esg.table,
            earnings: earnings.table,
            quality_growth_scores,
            esg_scores,
            earnings_scores,
            ranking,
            report,
        }
    }
}
