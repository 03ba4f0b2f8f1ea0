//! Final score: inner join of the three component score tables

use serde::Serialize;
use tracing::warn;

use crate::table::{ScoreTable, Ticker};

/// One row of the final ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub ticker: Ticker,
    pub quality_growth: i32,
    pub esg: i32,
    pub earnings_surprise: i32,
    pub total: i32,
}

/// Ranked final scores, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub rows: Vec<FinalScore>,
    /// Tickers missing from at least one component table
    pub dropped: Vec<Ticker>,
}

impl Ranking {
    pub fn get(&self, ticker: &Ticker) -> Option<&FinalScore> {
        self.rows.iter().find(|row| &row.ticker == ticker)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Join the component tables on ticker and rank by the summed score
///
/// Only tickers present in all three tables are kept. Rows follow the order
/// of the quality/growth table before ranking; equal totals keep that order.
pub fn combine(quality_growth: &ScoreTable, esg: &ScoreTable, earnings: &ScoreTable) -> Ranking {
    let mut rows = Vec::with_capacity(quality_growth.len());
    let mut dropped = Vec::new();

    for (ticker, qg) in quality_growth.iter() {
        match (esg.get(ticker), earnings.get(ticker)) {
            (Some(esg), Some(earnings_surprise)) => rows.push(FinalScore {
                ticker: ticker.clone(),
                quality_growth: qg,
                esg,
                earnings_surprise,
                total: qg + esg + earnings_surprise,
            }),
            _ => dropped.push(ticker.clone()),
        }
    }

    // Tickers only present in the later tables cannot join either
    for (ticker, _) in esg.iter().chain(earnings.iter()) {
        if quality_growth.get(ticker).is_none() && !dropped.contains(ticker) {
            dropped.push(ticker.clone());
        }
    }

    if !dropped.is_empty() {
        warn!(?dropped, "tickers missing from a component score table were excluded");
    }

    rows.sort_by(|a, b| b.total.cmp(&a.total));

    Ranking { rows, dropped }
}
