//! Environmental, social and governance scores

use tracing::info;

use crate::api::MarketDataSource;
use crate::metrics::{Assembled, fill};
use crate::report::{RunReport, Stage};
use crate::table::{MetricTable, Ticker};

pub const ENVIRONMENT_SCORE: &str = "Environment Score";
pub const SOCIAL_SCORE: &str = "Social Score";
pub const GOVERNANCE_SCORE: &str = "Governance Score";

pub const METRICS: [&str; 3] = [ENVIRONMENT_SCORE, SOCIAL_SCORE, GOVERNANCE_SCORE];

/// Build the ESG table for `tickers`
pub async fn assemble(source: &dyn MarketDataSource, tickers: &[Ticker]) -> Assembled {
    let mut table = MetricTable::zeroed(&METRICS, tickers);
    let mut report = RunReport::new();

    for ticker in tickers {
        match source.esg_scores(ticker).await {
            Ok(esg) => {
                let missing = fill(
                    &mut table,
                    ticker,
                    &[
                        (ENVIRONMENT_SCORE, esg.environmental_score),
                        (SOCIAL_SCORE, esg.social_score),
                        (GOVERNANCE_SCORE, esg.governance_score),
                    ],
                );
                report.record_fields(Stage::Esg, ticker, missing);
            }
            Err(e) => report.record_failure(Stage::Esg, ticker, &e),
        }
    }

    info!(
        tickers = tickers.len(),
        failures = report.failure_count(),
        "ESG metrics assembled"
    );

    Assembled { table, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EsgScores, MockMarketDataSource};
    use crate::error::ScreenerError;

    #[tokio::test]
    async fn test_assemble_esg() {
        let mut source = MockMarketDataSource::new();
        source.expect_esg_scores().returning(|ticker| {
            if ticker.as_str() == "TSLA" {
                return Err(ScreenerError::DataUnavailable {
                    symbol: ticker.to_string(),
                    reason: "no rating".to_string(),
                });
            }
            Ok(EsgScores {
                date: None,
                environmental_score: Some(65.0),
                social_score: Some(48.5),
                governance_score: Some(57.2),
            })
        });

        let tickers = vec![Ticker::parse("AAPL").unwrap(), Ticker::parse("TSLA").unwrap()];
        let assembled = assemble(&source, &tickers).await;

        assert_eq!(assembled.table.column(ENVIRONMENT_SCORE), Some(vec![65.0, 0.0]));
        assert_eq!(assembled.table.column(GOVERNANCE_SCORE), Some(vec![57.2, 0.0]));
        assert_eq!(assembled.report.failure_count(), 1);
    }
}
