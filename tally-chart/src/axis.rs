/// Time axes with a single instant are widened by a minute either side.
const MIN_TIME_PAD_MS: f64 = 60_000.0;
/// Fraction of the data span added above and below the data.
const MARGIN: f64 = 0.05;

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

impl Axis {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max }
    }

    /// Axis over epoch milliseconds `first..=last` with a small margin.
    pub fn time(label: impl Into<String>, first: i64, last: i64) -> Self {
        let (lo, hi) = (first.min(last) as f64, first.max(last) as f64);
        let pad = if hi > lo { (hi - lo) * MARGIN } else { MIN_TIME_PAD_MS };
        Self::new(label, lo - pad, hi + pad)
    }

    /// Axis over values `min..=max` with a small margin. A flat series is
    /// padded by 1 or 5% of its magnitude, whichever is larger.
    pub fn values(label: impl Into<String>, min: f64, max: f64) -> Self {
        let (lo, hi) = (min.min(max), min.max(max));
        let pad = if hi > lo {
            (hi - lo) * MARGIN
        } else {
            (lo.abs() * MARGIN).max(1.0)
        };
        Self::new(label, lo - pad, hi + pad)
    }

    pub fn span(&self) -> f64 {
        (self.max - self.min).max(1e-9)
    }
}
