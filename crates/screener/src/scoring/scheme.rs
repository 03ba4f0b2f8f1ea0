//! Bucket schemes mapping a value's quantile range to an integer score

use serde::Serialize;

pub const QUARTILES: [f64; 3] = [0.25, 0.5, 0.75];
pub const TERCILES: [f64; 2] = [0.33, 0.66];

/// How a value is compared against the cut thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    /// First bucket whose upper cut satisfies `value <= cut`, scanning upwards
    AtMost,
    /// First bucket whose lower cut satisfies `value >= cut`, scanning downwards
    AtLeast,
}

/// Quantile cuts plus one score per resulting bucket
///
/// `scores` has one more entry than `cuts`; the last entry applies when no
/// cut matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketScheme {
    pub cuts: &'static [f64],
    pub scores: &'static [i32],
    pub comparison: Comparison,
}

impl BucketScheme {
    /// Quality/growth metric where higher is better: 1..=4
    pub const QUALITY_HIGHER: Self = Self {
        cuts: &QUARTILES,
        scores: &[1, 2, 3, 4],
        comparison: Comparison::AtMost,
    };

    /// Quality/growth metric where lower is better: 1..=4
    pub const QUALITY_LOWER: Self = Self {
        cuts: &QUARTILES,
        scores: &[1, 2, 3, 4],
        comparison: Comparison::AtLeast,
    };

    /// ESG component: -1, 0 or +1
    pub const ESG: Self = Self {
        cuts: &TERCILES,
        scores: &[-1, 0, 1],
        comparison: Comparison::AtMost,
    };

    /// Mean earnings surprise: -2, -1, +1 or +2
    pub const SURPRISE_AVERAGE: Self = Self {
        cuts: &QUARTILES,
        scores: &[-2, -1, 1, 2],
        comparison: Comparison::AtMost,
    };

    /// Earnings surprise volatility, lower is better: +1, 0 or -1
    pub const SURPRISE_VOLATILITY: Self = Self {
        cuts: &TERCILES,
        scores: &[1, 0, -1],
        comparison: Comparison::AtMost,
    };

    /// Score `value` against thresholds computed at `self.cuts`
    ///
    /// Comparisons are inclusive, so a value equal to a threshold lands in
    /// the bucket the scan reaches first.
    pub fn score(&self, value: f64, thresholds: &[f64]) -> i32 {
        debug_assert_eq!(thresholds.len(), self.cuts.len());
        debug_assert_eq!(self.scores.len(), self.cuts.len() + 1);

        let bucket = match self.comparison {
            Comparison::AtMost => thresholds.iter().position(|t| value <= *t),
            Comparison::AtLeast => thresholds.iter().rev().position(|t| value >= *t),
        };

        self.scores[bucket.unwrap_or(thresholds.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Quartiles of [1, 2, 3, 4]
    const Q: [f64; 3] = [1.75, 2.5, 3.25];
    // Terciles of [10, 20, 30]
    const T: [f64; 2] = [16.6, 23.2];

    #[test]
    fn test_quality_higher_boundaries() {
        let s = BucketScheme::QUALITY_HIGHER;
        assert_eq!(s.score(1.0, &Q), 1);
        assert_eq!(s.score(1.75, &Q), 1);
        assert_eq!(s.score(1.76, &Q), 2);
        assert_eq!(s.score(2.5, &Q), 2);
        assert_eq!(s.score(2.51, &Q), 3);
        assert_eq!(s.score(3.25, &Q), 3);
        assert_eq!(s.score(3.26, &Q), 4);
    }

    #[test]
    fn test_quality_lower_boundaries() {
        let s = BucketScheme::QUALITY_LOWER;
        assert_eq!(s.score(4.0, &Q), 1);
        assert_eq!(s.score(3.25, &Q), 1);
        assert_eq!(s.score(3.24, &Q), 2);
        assert_eq!(s.score(2.5, &Q), 2);
        assert_eq!(s.score(2.49, &Q), 3);
        assert_eq!(s.score(1.75, &Q), 3);
        assert_eq!(s.score(1.74, &Q), 4);
    }

    #[test]
    fn test_esg_boundaries() {
        let s = BucketScheme::ESG;
        assert_eq!(s.score(16.6, &T), -1);
        assert_eq!(s.score(16.7, &T), 0);
        assert_eq!(s.score(23.2, &T), 0);
        assert_eq!(s.score(23.3, &T), 1);
    }

    #[test]
    fn test_surprise_average_boundaries() {
        let s = BucketScheme::SURPRISE_AVERAGE;
        assert_eq!(s.score(1.75, &Q), -2);
        assert_eq!(s.score(2.5, &Q), -1);
        assert_eq!(s.score(3.25, &Q), 1);
        assert_eq!(s.score(3.3, &Q), 2);
    }

    #[test]
    fn test_surprise_volatility_boundaries() {
        let s = BucketScheme::SURPRISE_VOLATILITY;
        assert_eq!(s.score(10.0, &T), 1);
        assert_eq!(s.score(16.6, &T), 1);
        assert_eq!(s.score(20.0, &T), 0);
        assert_eq!(s.score(23.2, &T), 0);
        assert_eq!(s.score(30.0, &T), -1);
    }
}
