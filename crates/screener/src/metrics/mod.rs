//! Metric table assembly
//!
//! Each assembler walks the ticker list sequentially, fetches the records of
//! its metric group and writes the values into a zero-filled [`MetricTable`].
//! A failed request leaves that request's metrics at zero and is recorded in
//! the returned [`RunReport`].

pub mod earnings;
pub mod esg;
pub mod quality_growth;

use crate::report::RunReport;
use crate::table::{MetricTable, Ticker};

/// A metric table together with the outcomes of the requests behind it
#[derive(Debug, Clone)]
pub struct Assembled {
    pub table: MetricTable,
    pub report: RunReport,
}

/// Write the present values into `table`, returning the names of null fields
pub(crate) fn fill(
    table: &mut MetricTable,
    ticker: &Ticker,
    values: &[(&'static str, Option<f64>)],
) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for (metric, value) in values {
        match value {
            Some(v) if v.is_finite() => {
                table.set(ticker, metric, *v);
            }
            _ => missing.push(*metric),
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_reports_missing() {
        let ticker = Ticker::parse("AAPL").unwrap();
        let mut table = MetricTable::zeroed(&["A", "B"], std::slice::from_ref(&ticker));

        let missing = fill(&mut table, &ticker, &[("A", Some(1.5)), ("B", None)]);

        assert_eq!(missing, vec!["B"]);
        assert_eq!(table.get(&ticker, "A"), Some(1.5));
        assert_eq!(table.get(&ticker, "B"), Some(0.0));
    }
}
