//! Per-stage outcomes collected during a run
//!
//! A failed request never aborts the run: the ticker keeps zero defaults for
//! the affected metrics and the failure is recorded here so it can be shown
//! next to the ranking.

use crate::error::ScreenerError;
use crate::table::Ticker;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// One data retrieval step for one ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Ratios,
    KeyMetrics,
    Growth,
    Esg,
    EarningsSurprise,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Ratios => "ratios",
            Stage::KeyMetrics => "key-metrics",
            Stage::Growth => "growth",
            Stage::Esg => "esg",
            Stage::EarningsSurprise => "earnings-surprise",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Every metric was retrieved
    Ok,
    /// The record was retrieved but some fields were null
    Partial { missing: Vec<String> },
    /// A series was used only up to its first unusable entry
    Truncated { used: usize, reason: String },
    /// Nothing usable was retrieved; all metrics of the stage stay at zero
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub ticker: Ticker,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Outcomes of every stage of a run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    outcomes: Vec<StageOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage result, given the names of any null fields
    pub fn record_fields(&mut self, stage: Stage, ticker: &Ticker, missing: Vec<&'static str>) {
        let outcome = if missing.is_empty() {
            Outcome::Ok
        } else {
            Outcome::Partial {
                missing: missing.into_iter().map(String::from).collect(),
            }
        };
        self.push(stage, ticker, outcome);
    }

    pub fn record_ok(&mut self, stage: Stage, ticker: &Ticker) {
        self.push(stage, ticker, Outcome::Ok);
    }

    /// Record a series cut short after `used` entries
    pub fn record_truncated(
        &mut self,
        stage: Stage,
        ticker: &Ticker,
        used: usize,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        warn!(stage = stage.name(), %ticker, used, %reason, "series cut short");
        self.push(stage, ticker, Outcome::Truncated { used, reason });
    }

    pub fn record_failure(&mut self, stage: Stage, ticker: &Ticker, error: &ScreenerError) {
        warn!(stage = stage.name(), %ticker, error = %error, "stage failed, using zero defaults");
        self.push(
            stage,
            ticker,
            Outcome::Failed {
                reason: error.to_string(),
            },
        );
    }

    fn push(&mut self, stage: Stage, ticker: &Ticker, outcome: Outcome) {
        self.outcomes.push(StageOutcome {
            stage,
            ticker: ticker.clone(),
            outcome,
        });
    }

    /// Append another report's outcomes
    pub fn extend(&mut self, other: RunReport) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn outcomes(&self) -> &[StageOutcome] {
        &self.outcomes
    }

    /// Outcomes that were not fully successful
    pub fn issues(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes.iter().filter(|o| o.outcome != Outcome::Ok)
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Failed { .. }))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let msft = Ticker::parse("MSFT").unwrap();
        let mut report = RunReport::new();
        assert!(report.is_clean());

        report.record_ok(Stage::Ratios, &msft);
        report.record_fields(Stage::KeyMetrics, &msft, vec![]);
        assert!(report.is_clean());

        report.record_fields(Stage::Growth, &msft, vec!["5Y CFO Growth"]);
        report.record_failure(
            Stage::Esg,
            &msft,
            &ScreenerError::ApiError("Invalid API KEY".to_string()),
        );

        assert_eq!(report.outcomes().len(), 4);
        assert_eq!(report.issues().count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_truncated_is_an_issue_not_a_failure() {
        let aapl = Ticker::parse("AAPL").unwrap();
        let mut report = RunReport::new();

        report.record_truncated(Stage::EarningsSurprise, &aapl, 11, "zero estimate");

        assert_eq!(report.issues().count(), 1);
        assert_eq!(report.failure_count(), 0);

        let value = serde_json::to_value(&report.outcomes()[0]).unwrap();
        assert_eq!(value["status"], "truncated");
        assert_eq!(value["used"], 11);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = StageOutcome {
            stage: Stage::EarningsSurprise,
            ticker: Ticker::parse("PFE").unwrap(),
            outcome: Outcome::Failed {
                reason: "timeout".to_string(),
            },
        };

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["stage"], "earnings-surprise");
        assert_eq!(value["ticker"], "PFE");
        assert_eq!(value["status"], "failed");
        assert_eq!(value["reason"], "timeout");
    }
}
