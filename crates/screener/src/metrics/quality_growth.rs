//! Quality and growth ratios
//!
//! Twelve metrics drawn from three endpoints: TTM ratios, TTM key metrics and
//! annual financial growth.

use tracing::info;

use crate::api::MarketDataSource;
use crate::metrics::{Assembled, fill};
use crate::report::{RunReport, Stage};
use crate::table::{MetricTable, Ticker};

pub const OPERATING_PROFIT_MARGIN: &str = "Operating Profit Margin";
pub const NET_PROFIT_MARGIN: &str = "Net Profit Margin";
pub const ROA: &str = "ROA";
pub const ROE: &str = "ROE";
pub const ROCE: &str = "ROCE";
pub const CURRENT_RATIO: &str = "Current Ratio";
pub const DEBT_TO_EQUITY: &str = "Debt/Equity Ratio";
pub const DEBT_TO_ASSETS: &str = "Debt/Assets Ratio";
pub const FCF_YIELD: &str = "FCF Yield";
pub const REVENUE_GROWTH_5Y: &str = "5Y Revenue Growth";
pub const CFO_GROWTH_5Y: &str = "5Y CFO Growth";
pub const EPS_GROWTH_5Y: &str = "5Y EPS Growth";

/// Column order of the quality/growth table
pub const METRICS: [&str; 12] = [
    OPERATING_PROFIT_MARGIN,
    NET_PROFIT_MARGIN,
    ROA,
    ROE,
    ROCE,
    CURRENT_RATIO,
    DEBT_TO_EQUITY,
    DEBT_TO_ASSETS,
    FCF_YIELD,
    REVENUE_GROWTH_5Y,
    CFO_GROWTH_5Y,
    EPS_GROWTH_5Y,
];

/// Metrics where a lower value scores better
pub const LOWER_IS_BETTER: [&str; 2] = [DEBT_TO_EQUITY, DEBT_TO_ASSETS];

/// Build the quality/growth table for `tickers`
pub async fn assemble(source: &dyn MarketDataSource, tickers: &[Ticker]) -> Assembled {
    let mut table = MetricTable::zeroed(&METRICS, tickers);
    let mut report = RunReport::new();

    for ticker in tickers {
        match source.ratios_ttm(ticker).await {
            Ok(ratios) => {
                let missing = fill(
                    &mut table,
                    ticker,
                    &[
                        (OPERATING_PROFIT_MARGIN, ratios.operating_profit_margin),
                        (NET_PROFIT_MARGIN, ratios.net_profit_margin),
                        (ROA, ratios.return_on_assets),
                        (ROE, ratios.return_on_equity),
                        (ROCE, ratios.return_on_capital_employed),
                    ],
                );
                report.record_fields(Stage::Ratios, ticker, missing);
            }
            Err(e) => report.record_failure(Stage::Ratios, ticker, &e),
        }

        match source.key_metrics_ttm(ticker).await {
            Ok(metrics) => {
                let missing = fill(
                    &mut table,
                    ticker,
                    &[
                        (CURRENT_RATIO, metrics.current_ratio),
                        (DEBT_TO_EQUITY, metrics.debt_to_equity),
                        (DEBT_TO_ASSETS, metrics.debt_to_assets),
                        (FCF_YIELD, metrics.free_cash_flow_yield),
                    ],
                );
                report.record_fields(Stage::KeyMetrics, ticker, missing);
            }
            Err(e) => report.record_failure(Stage::KeyMetrics, ticker, &e),
        }

        match source.financial_growth(ticker).await {
            Ok(growth) => {
                let missing = fill(
                    &mut table,
                    ticker,
                    &[
                        (REVENUE_GROWTH_5Y, growth.five_y_revenue_growth_per_share),
                        (CFO_GROWTH_5Y, growth.five_y_operating_cf_growth_per_share),
                        (EPS_GROWTH_5Y, growth.five_y_net_income_growth_per_share),
                    ],
                );
                report.record_fields(Stage::Growth, ticker, missing);
            }
            Err(e) => report.record_failure(Stage::Growth, ticker, &e),
        }
    }

    info!(
        tickers = tickers.len(),
        failures = report.failure_count(),
        "quality/growth metrics assembled"
    );

    Assembled { table, report }
}
