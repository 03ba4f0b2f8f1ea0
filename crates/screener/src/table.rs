//! Ticker, metric and score tables
//!
//! All tables keep their rows in the order the tickers were supplied, which is
//! also the order used to break ties when ranking.

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper-cased stock symbol, the join key across every table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalise and validate a raw symbol
    ///
    /// Symbols are trimmed and upper-cased. Letters, digits, `.`, `-` and `^`
    /// are accepted (`BRK.B`, `RDS-A`, `^GSPC`).
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = raw.trim().to_uppercase();

        if symbol.is_empty() {
            return Err(ScreenerError::InvalidSymbol(raw.to_string()));
        }

        if !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^'))
        {
            return Err(ScreenerError::InvalidSymbol(raw.to_string()));
        }

        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ScreenerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

/// Parse a list of raw symbols, dropping duplicates while keeping first-seen order
pub fn parse_tickers<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Ticker>> {
    let mut tickers: Vec<Ticker> = Vec::with_capacity(raw.len());
    for symbol in raw {
        let ticker = Ticker::parse(symbol.as_ref())?;
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    Ok(tickers)
}

/// One row of a [`MetricTable`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub ticker: Ticker,
    pub values: Vec<f64>,
}

/// Ticker × metric table of raw values
///
/// Every ticker is present from construction with every metric set to 0.0;
/// assemblers overwrite the values they manage to retrieve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTable {
    metrics: Vec<&'static str>,
    rows: Vec<MetricRow>,
}

impl MetricTable {
    /// Create a zero-filled table
    pub fn zeroed(metrics: &[&'static str], tickers: &[Ticker]) -> Self {
        let rows = tickers
            .iter()
            .map(|ticker| MetricRow {
                ticker: ticker.clone(),
                values: vec![0.0; metrics.len()],
            })
            .collect();

        Self {
            metrics: metrics.to_vec(),
            rows,
        }
    }

    pub fn metrics(&self) -> &[&'static str] {
        &self.metrics
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.rows.iter().map(|row| &row.ticker)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn metric_index(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| *m == metric)
    }

    /// Set a value; returns `false` when the ticker or metric is unknown
    pub fn set(&mut self, ticker: &Ticker, metric: &str, value: f64) -> bool {
        let Some(col) = self.metric_index(metric) else {
            return false;
        };

        match self.rows.iter_mut().find(|row| &row.ticker == ticker) {
            Some(row) => {
                row.values[col] = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, ticker: &Ticker, metric: &str) -> Option<f64> {
        let col = self.metric_index(metric)?;
        self.rows
            .iter()
            .find(|row| &row.ticker == ticker)
            .map(|row| row.values[col])
    }

    /// All values of one metric, in row order
    pub fn column(&self, metric: &str) -> Option<Vec<f64>> {
        let col = self.metric_index(metric)?;
        Some(self.rows.iter().map(|row| row.values[col]).collect())
    }
}

/// Integer score per ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreTable {
    label: &'static str,
    entries: Vec<(Ticker, i32)>,
}

impl ScoreTable {
    /// Create a table with every ticker at zero
    pub fn zeroed(label: &'static str, tickers: impl IntoIterator<Item = Ticker>) -> Self {
        Self {
            label,
            entries: tickers.into_iter().map(|t| (t, 0)).collect(),
        }
    }

    /// Column label used in reports, e.g. `"QG Score"`
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Add `delta` to a ticker's score, inserting it when absent
    pub fn add(&mut self, ticker: &Ticker, delta: i32) {
        match self.entries.iter_mut().find(|(t, _)| t == ticker) {
            Some((_, score)) => *score += delta,
            None => self.entries.push((ticker.clone(), delta)),
        }
    }

    pub fn get(&self, ticker: &Ticker) -> Option<i32> {
        self.entries
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, score)| *score)
    }

    pub fn remove(&mut self, ticker: &Ticker) -> Option<i32> {
        let index = self.entries.iter().position(|(t, _)| t == ticker)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, i32)> {
        self.entries.iter().map(|(t, s)| (t, *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by score, highest first; ties keep insertion order
    pub fn ranked(&self) -> Vec<(&Ticker, i32)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(symbol: &str) -> Ticker {
        Ticker::parse(symbol).unwrap()
    }

    #[test]
    fn test_ticker_normalisation() {
        assert_eq!(t(" aapl ").as_str(), "AAPL");
        assert_eq!(t("brk.b").as_str(), "BRK.B");
        assert!(Ticker::parse("").is_err());
        assert!(Ticker::parse("   ").is_err());
        assert!(Ticker::parse("AA PL").is_err());
        assert!(Ticker::parse("AAPL;rm").is_err());
    }

    #[test]
    fn test_ticker_serde() {
        let ticker: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ticker, t("MSFT"));
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"MSFT\"");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }

    #[test]
    fn test_parse_tickers_dedup() {
        let tickers = parse_tickers(&["msft", "AAPL", "MSFT", "pfe"]).unwrap();
        let symbols: Vec<_> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(symbols, vec!["MSFT", "AAPL", "PFE"]);
    }

    #[test]
    fn test_metric_table_defaults_to_zero() {
        let tickers = vec![t("MSFT"), t("AAPL")];
        let mut table = MetricTable::zeroed(&["ROA", "ROE"], &tickers);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&tickers[0], "ROA"), Some(0.0));

        assert!(table.set(&tickers[1], "ROE", 0.42));
        assert_eq!(table.get(&tickers[1], "ROE"), Some(0.42));
        assert_eq!(table.column("ROE"), Some(vec![0.0, 0.42]));

        assert!(!table.set(&t("TSLA"), "ROE", 1.0));
        assert!(!table.set(&tickers[0], "EBIT", 1.0));
        assert_eq!(table.column("EBIT"), None);
    }

    #[test]
    fn test_score_table_ranked_is_stable() {
        let mut scores = ScoreTable::zeroed("Score", vec![t("A"), t("B"), t("C")]);
        scores.add(&t("A"), 1);
        scores.add(&t("B"), 3);
        scores.add(&t("C"), 1);
        scores.add(&t("D"), 2);

        let ranked: Vec<_> = scores
            .ranked()
            .into_iter()
            .map(|(ticker, score)| (ticker.as_str().to_string(), score))
            .collect();

        assert_eq!(
            ranked,
            vec![
                ("B".to_string(), 3),
                ("D".to_string(), 2),
                ("A".to_string(), 1),
                ("C".to_string(), 1),
            ]
        );
        assert_eq!(scores.remove(&t("D")), Some(2));
        assert_eq!(scores.len(), 3);
    }
}
