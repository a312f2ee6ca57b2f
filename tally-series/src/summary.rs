use crate::record::{Sample, TimestampMs};

/// Extent of a run of samples, used for axis ranges and log lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    count: usize,
    first: TimestampMs,
    last: TimestampMs,
    min: f64,
    max: f64,
}

impl Summary {
    /// Return a Summary of `samples`, or None when there are none
    pub fn of(samples: &[Sample]) -> Option<Self> {
        let head = samples.first()?;
        let init = Summary {
            count: 0,
            first: head.timestamp_ms,
            last: head.timestamp_ms,
            min: head.value,
            max: head.value,
        };

        Some(samples.iter().fold(init, |mut acc, s| {
            acc.count += 1;
            acc.first = acc.first.min(s.timestamp_ms);
            acc.last = acc.last.max(s.timestamp_ms);
            acc.min = acc.min.min(s.value);
            acc.max = acc.max.max(s.value);
            acc
        }))
    }

    /// Get the number of samples summarised
    pub fn count(&self) -> usize {
        self.count
    }

    /// Earliest timestamp
    pub fn first(&self) -> TimestampMs {
        self.first
    }

    /// Latest timestamp
    pub fn last(&self) -> TimestampMs {
        self.last
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Milliseconds between the first and last sample
    pub fn span_ms(&self) -> TimestampMs {
        self.last - self.first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_summary() {
        assert_eq!(Summary::of(&[]), None);
    }

    #[test]
    fn single_sample_is_degenerate() {
        let s = Summary::of(&[Sample::new(10, 4.0)]).unwrap();
        assert_eq!(s.count(), 1);
        assert_eq!(s.span_ms(), 0);
        assert_eq!((s.min(), s.max()), (4.0, 4.0));
    }

    #[test]
    fn tracks_extents() {
        let samples = [
            Sample::new(100, 5.0),
            Sample::new(200, -1.0),
            Sample::new(300, 9.5),
        ];
        let s = Summary::of(&samples).unwrap();

        assert_eq!(s.count(), 3);
        assert_eq!((s.first(), s.last()), (100, 300));
        assert_eq!((s.min(), s.max()), (-1.0, 9.5));
        assert_eq!(s.span_ms(), 200);
    }
}
