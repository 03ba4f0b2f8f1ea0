//! Batch-relative quantile scoring
//!
//! Each metric column gets its own thresholds, computed from the tickers in
//! the current run. A ticker's score for a table is the sum of its bucket
//! scores over every scored column.

pub mod quantile;
pub mod scheme;

pub use quantile::Quantiles;
pub use scheme::{BucketScheme, Comparison};

use tracing::{debug, warn};

use crate::metrics::{earnings, esg, quality_growth};
use crate::table::{MetricTable, ScoreTable};

pub const QG_SCORE: &str = "QG Score";
pub const ESG_SCORE: &str = "ESG Score";
pub const EARNINGS_SCORE: &str = "Earnings Surprise Score";

/// Scheme applied to one metric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRule {
    pub metric: &'static str,
    pub scheme: BucketScheme,
}

/// Score every row of `table` and sum the bucket scores per ticker
///
/// Every ticker of the table appears in the result, at zero when no rule
/// applies.
pub fn score_table(label: &'static str, table: &MetricTable, rules: &[ColumnRule]) -> ScoreTable {
    let mut scores = ScoreTable::zeroed(label, table.tickers().cloned());

    for rule in rules {
        let Some(column) = table.column(rule.metric) else {
            warn!(metric = rule.metric, table = label, "no such column, rule skipped");
            continue;
        };

        let quantiles = Quantiles::new(&column);
        let Some(thresholds) = rule
            .scheme
            .cuts
            .iter()
            .map(|q| quantiles.at(*q))
            .collect::<Option<Vec<f64>>>()
        else {
            continue;
        };

        debug!(metric = rule.metric, ?thresholds, "column thresholds");

        for (ticker, value) in table.tickers().zip(column) {
            scores.add(ticker, rule.scheme.score(value, &thresholds));
        }
    }

    scores
}

pub fn quality_growth_rules() -> Vec<ColumnRule> {
    quality_growth::METRICS
        .into_iter()
        .map(|metric| ColumnRule {
            metric,
            scheme: if quality_growth::LOWER_IS_BETTER.contains(&metric) {
                BucketScheme::QUALITY_LOWER
            } else {
                BucketScheme::QUALITY_HIGHER
            },
        })
        .collect()
}

pub fn esg_rules() -> Vec<ColumnRule> {
    esg::METRICS
        .into_iter()
        .map(|metric| ColumnRule {
            metric,
            scheme: BucketScheme::ESG,
        })
        .collect()
}

pub fn earnings_rules() -> Vec<ColumnRule> {
    vec![
        ColumnRule {
            metric: earnings::SURPRISE_AVERAGE,
            scheme: BucketScheme::SURPRISE_AVERAGE,
        },
        ColumnRule {
            metric: earnings::SURPRISE_STD_DEV,
            scheme: BucketScheme::SURPRISE_VOLATILITY,
        },
    ]
}

pub fn score_quality_growth(table: &MetricTable) -> ScoreTable {
    score_table(QG_SCORE, table, &quality_growth_rules())
}

pub fn score_esg(table: &MetricTable) -> ScoreTable {
    score_table(ESG_SCORE, table, &esg_rules())
}

pub fn score_earnings(table: &MetricTable) -> ScoreTable {
    score_table(EARNINGS_SCORE, table, &earnings_rules())
}
