//! Column quantiles
//!
//! Linear interpolation between closest ranks: for `n` sorted values the
//! q-quantile sits at position `q * (n - 1)`.

/// Sorted copy of a column, ready for quantile lookups
#[derive(Debug, Clone, PartialEq)]
pub struct Quantiles {
    sorted: Vec<f64>,
}

impl Quantiles {
    /// Non-finite values are ignored
    pub fn new(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// The `q`-quantile, `q` clamped to `[0, 1]`; `None` for an empty column
    pub fn at(&self, q: f64) -> Option<f64> {
        let last = self.sorted.len().checked_sub(1)?;
        let position = q.clamp(0.0, 1.0) * last as f64;

        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        let fraction = position - lower as f64;

        let low = self.sorted[lower];
        let high = self.sorted[upper.min(last)];
        Some(low + (high - low) * fraction)
    }
}
