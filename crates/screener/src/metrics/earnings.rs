//! Earnings surprise statistics
//!
//! The surprise of a quarter is `actual / estimated - 1`. Over the most recent
//! quarters the table keeps the mean surprise and its population standard
//! deviation.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::api::{EarningsSurprise, MarketDataSource};
use crate::error::{Result, ScreenerError};
use crate::metrics::Assembled;
use crate::report::{RunReport, Stage};
use crate::table::{MetricTable, Ticker};

pub const SURPRISE_AVERAGE: &str = "Earnings Surprise L5Y Average";
pub const SURPRISE_STD_DEV: &str = "Earnings Surprise Standard Deviation";

pub const METRICS: [&str; 2] = [SURPRISE_AVERAGE, SURPRISE_STD_DEV];

/// Mean and spread of the quarterly surprises
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurpriseStats {
    pub mean: f64,
    pub std_dev: f64,
    /// Quarters the statistics were computed over
    pub quarters: usize,
    /// Why the scan stopped before the end of the window, if it did
    pub cut_short: Option<String>,
}

/// Compute surprise statistics over the `window` most recent quarters
///
/// Quarters are ordered by date, newest first, when every date parses;
/// otherwise the provider's order is kept. The scan stops at the first
/// quarter that lacks a value or has a zero estimate, and the statistics
/// cover the quarters before it. Fails when fewer than `min_quarters`
/// quarters were usable.
pub fn surprise_stats(
    ticker: &Ticker,
    quarters: &[EarningsSurprise],
    window: usize,
    min_quarters: usize,
) -> Result<SurpriseStats> {
    let mut ordered: Vec<&EarningsSurprise> = quarters.iter().collect();

    let dates: Option<Vec<NaiveDate>> = ordered
        .iter()
        .map(|q| {
            q.date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
        .collect();

    match dates {
        Some(dates) => {
            let mut dated: Vec<_> = dates.into_iter().zip(ordered).collect();
            dated.sort_by(|a, b| b.0.cmp(&a.0));
            ordered = dated.into_iter().map(|(_, q)| q).collect();
        }
        None => debug!(%ticker, "undated earnings records, keeping provider order"),
    }

    ordered.truncate(window);

    let mut surprises = Vec::with_capacity(ordered.len());
    let mut cut_short = None;
    for quarter in ordered {
        match quarter_surprise(quarter) {
            Ok(surprise) => surprises.push(surprise),
            Err(reason) => {
                cut_short = Some(reason);
                break;
            }
        }
    }

    if surprises.len() < min_quarters {
        return Err(match cut_short {
            Some(reason) => ScreenerError::MalformedData {
                symbol: ticker.to_string(),
                reason,
            },
            None => ScreenerError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!(
                    "{} reported quarters, {min_quarters} required",
                    surprises.len()
                ),
            },
        });
    }

    let n = surprises.len() as f64;
    let mean = surprises.iter().sum::<f64>() / n;
    let variance = surprises.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    Ok(SurpriseStats {
        mean,
        std_dev: variance.sqrt(),
        quarters: surprises.len(),
        cut_short,
    })
}

/// Surprise of one quarter, or why it cannot be used
fn quarter_surprise(quarter: &EarningsSurprise) -> std::result::Result<f64, String> {
    let date = quarter.date.as_deref().unwrap_or("undated");

    let actual = quarter.actual_earning_result;
    let estimated = quarter.estimated_earning;
    let (Some(actual), Some(estimated)) = (actual, estimated) else {
        return Err(format!("quarter {date} is missing actual or estimate"));
    };

    if estimated == 0.0 {
        return Err(format!("quarter {date} has a zero estimate"));
    }

    let surprise = actual / estimated - 1.0;
    if !surprise.is_finite() {
        return Err(format!("quarter {date} has a non-finite surprise"));
    }

    Ok(surprise)
}

/// Build the earnings surprise table for `tickers`
pub async fn assemble(
    source: &dyn MarketDataSource,
    tickers: &[Ticker],
    window: usize,
    min_quarters: usize,
) -> Assembled {
    let mut table = MetricTable::zeroed(&METRICS, tickers);
    let mut report = RunReport::new();

    for ticker in tickers {
        let stats = match source.earnings_surprises(ticker).await {
            Ok(quarters) => surprise_stats(ticker, &quarters, window, min_quarters),
            Err(e) => Err(e),
        };

        match stats {
            Ok(stats) => {
                debug!(
                    %ticker,
                    mean = stats.mean,
                    std_dev = stats.std_dev,
                    quarters = stats.quarters,
                    "earnings surprise"
                );
                table.set(ticker, SURPRISE_AVERAGE, stats.mean);
                table.set(ticker, SURPRISE_STD_DEV, stats.std_dev);
                match stats.cut_short {
                    Some(reason) => report.record_truncated(
                        Stage::EarningsSurprise,
                        ticker,
                        stats.quarters,
                        reason,
                    ),
                    None => report.record_ok(Stage::EarningsSurprise, ticker),
                }
            }
            Err(e) => report.record_failure(Stage::EarningsSurprise, ticker, &e),
        }
    }

    info!(
        tickers = tickers.len(),
        failures = report.failure_count(),
        "earnings surprise metrics assembled"
    );

    Assembled { table, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataSource;
    use crate::config::ScreenerConfig;
    use crate::report::Outcome;

    fn t(symbol: &str) -> Ticker {
        Ticker::parse(symbol).unwrap()
    }

    fn quarter(date: &str, actual: f64, estimated: f64) -> EarningsSurprise {
        EarningsSurprise {
            date: Some(date.to_string()),
            actual_earning_result: Some(actual),
            estimated_earning: Some(estimated),
        }
    }

    /// Twelve quarters from 2021-01-25 to 2023-10-25, oldest first, each
    /// beating a 1.0 estimate by 10%
    fn three_years() -> Vec<EarningsSurprise> {
        (0..12)
            .map(|i| quarter(&format!("{}-{:02}-25", 2021 + i / 4, 1 + (i % 4) * 3), 1.1, 1.0))
            .collect()
    }

    #[test]
    fn test_mean_and_population_std() {
        // surprises: +10%, -10%, +10%, -10%
        let quarters = vec![
            quarter("2024-04-25", 1.1, 1.0),
            quarter("2024-01-25", 0.9, 1.0),
            quarter("2023-10-25", 2.2, 2.0),
            quarter("2023-07-25", 1.8, 2.0),
        ];

        let stats = surprise_stats(&t("MSFT"), &quarters, 20, 4).unwrap();
        assert_eq!(stats.quarters, 4);
        assert_eq!(stats.cut_short, None);
        assert!(stats.mean.abs() < 1e-12);
        assert!((stats.std_dev - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_uses_most_recent_quarters() {
        // Provider order scrambled; the two newest quarters beat by 50%
        let quarters = vec![
            quarter("2022-01-25", 1.0, 2.0),
            quarter("2024-01-25", 3.0, 2.0),
            quarter("2023-01-25", 1.0, 2.0),
            quarter("2024-04-25", 1.5, 1.0),
        ];

        let stats = surprise_stats(&t("AAPL"), &quarters, 2, 2).unwrap();
        assert_eq!(stats.quarters, 2);
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!(stats.std_dev.abs() < 1e-12);
    }

    #[test]
    fn test_undated_records_keep_provider_order() {
        let quarters = vec![
            EarningsSurprise {
                date: None,
                actual_earning_result: Some(2.0),
                estimated_earning: Some(1.0),
            },
            quarter("2020-01-01", 0.0, 1.0),
        ];

        let stats = surprise_stats(&t("AAPL"), &quarters, 1, 1).unwrap();
        assert!((stats.mean - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_history_uses_available_quarters() {
        let min = ScreenerConfig::default().min_earnings_quarters;
        let stats = surprise_stats(&t("ABNB"), &three_years(), 20, min).unwrap();

        assert_eq!(stats.quarters, 12);
        assert_eq!(stats.cut_short, None);
        assert!((stats.mean - 0.1).abs() < 1e-12);
        assert!(stats.std_dev.abs() < 1e-12);
    }

    #[test]
    fn test_too_few_quarters_fails() {
        let quarters = vec![quarter("2024-04-25", 1.1, 1.0); 19];
        let err = surprise_stats(&t("TSLA"), &quarters, 20, 20).unwrap_err();
        assert!(matches!(err, ScreenerError::DataUnavailable { .. }));
    }

    #[test]
    fn test_zero_estimate_in_oldest_quarter_drops_only_that_quarter() {
        let mut quarters = three_years();
        quarters[0].estimated_earning = Some(0.0);

        let stats = surprise_stats(&t("PFE"), &quarters, 20, 1).unwrap();

        assert_eq!(stats.quarters, 11);
        assert!((stats.mean - 0.1).abs() < 1e-12);
        assert_eq!(
            stats.cut_short.as_deref(),
            Some("quarter 2021-01-25 has a zero estimate")
        );
    }

    #[test]
    fn test_zero_estimate_mid_window_stops_the_scan() {
        // 2022-07-25 is unusable; the five newer quarters are kept, the
        // older ones are not
        let mut quarters = three_years();
        quarters[6].estimated_earning = Some(0.0);
        quarters[0].actual_earning_result = Some(5.0);

        let stats = surprise_stats(&t("PFE"), &quarters, 20, 1).unwrap();

        assert_eq!(stats.quarters, 5);
        assert!((stats.mean - 0.1).abs() < 1e-12);
        assert!(stats.cut_short.is_some());
    }

    #[test]
    fn test_unusable_latest_quarter_fails() {
        let quarters = vec![quarter("2024-04-25", 0.1, 0.0), quarter("2024-01-25", 1.1, 1.0)];
        let err = surprise_stats(&t("TSLA"), &quarters, 20, 1).unwrap_err();
        assert!(matches!(err, ScreenerError::MalformedData { .. }));
    }

    #[test]
    fn test_missing_value_below_minimum_fails() {
        let quarters = vec![
            quarter("2024-04-25", 1.1, 1.0),
            EarningsSurprise {
                date: Some("2024-01-25".to_string()),
                actual_earning_result: None,
                estimated_earning: Some(1.0),
            },
        ];

        let stats = surprise_stats(&t("PFE"), &quarters, 20, 1).unwrap();
        assert_eq!(stats.quarters, 1);

        let err = surprise_stats(&t("PFE"), &quarters, 20, 2).unwrap_err();
        assert!(matches!(err, ScreenerError::MalformedData { .. }));
    }

    #[test]
    fn test_window_ignores_older_malformed_quarters() {
        let mut quarters = vec![quarter("2024-04-25", 1.2, 1.0)];
        quarters.push(quarter("2019-04-25", 1.0, 0.0));

        let stats = surprise_stats(&t("PFE"), &quarters, 1, 1).unwrap();
        assert!((stats.mean - 0.2).abs() < 1e-12);
        assert_eq!(stats.cut_short, None);
    }

    #[tokio::test]
    async fn test_assemble_zero_fills_failures() {
        let mut source = MockMarketDataSource::new();
        source.expect_earnings_surprises().returning(|ticker| {
            if ticker.as_str() == "MSFT" {
                Ok(vec![quarter("2024-04-25", 1.1, 1.0), quarter("2024-01-25", 1.3, 1.0)])
            } else {
                Ok(vec![quarter("2024-04-25", 1.1, 1.0)])
            }
        });

        let tickers = vec![t("MSFT"), t("TSLA")];
        let assembled = assemble(&source, &tickers, 20, 2).await;

        let mean = assembled.table.get(&tickers[0], SURPRISE_AVERAGE).unwrap();
        assert!((mean - 0.2).abs() < 1e-12);
        assert_eq!(assembled.table.get(&tickers[1], SURPRISE_AVERAGE), Some(0.0));
        assert_eq!(assembled.table.get(&tickers[1], SURPRISE_STD_DEV), Some(0.0));
        assert_eq!(assembled.report.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_assemble_reports_cut_short_history() {
        let mut source = MockMarketDataSource::new();
        source.expect_earnings_surprises().returning(|_| {
            let mut quarters = three_years();
            quarters[0].estimated_earning = Some(0.0);
            Ok(quarters)
        });

        let tickers = vec![t("PFE")];
        let assembled = assemble(&source, &tickers, 20, 1).await;

        let mean = assembled.table.get(&tickers[0], SURPRISE_AVERAGE).unwrap();
        assert!((mean - 0.1).abs() < 1e-12);
        assert_eq!(assembled.report.failure_count(), 0);

        let issue = assembled.report.issues().next().unwrap();
        assert!(matches!(issue.outcome, Outcome::Truncated { used: 11, .. }));
    }
}
