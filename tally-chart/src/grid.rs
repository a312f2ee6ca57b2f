/// `steps` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 {
        return vec![start, end];
    }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Decimal places needed to tell apart labels `step` apart.
pub fn value_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    ((-step.log10()).ceil() as usize).min(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 10.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn linspace_degenerate_steps() {
        assert_eq!(linspace(1.0, 3.0, 1), vec![1.0, 3.0]);
    }

    #[test]
    fn precision_follows_step() {
        assert_eq!(value_precision(25.0), 0);
        assert_eq!(value_precision(1.0), 0);
        assert_eq!(value_precision(0.5), 1);
        assert_eq!(value_precision(0.04), 2);
        assert_eq!(value_precision(1e-12), 6);
        assert_eq!(value_precision(f64::NAN), 0);
    }
}
