//! Spread of per-worker iteration counts, complementing the fairness index.

use average::{Max, Min, Variance};

/// Summary of one run's per-worker iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// std_dev / mean; 0 when the mean is 0.
    pub cv: f64,
    pub count: usize,
}

/// Computes min, max, mean and population standard deviation.
pub fn iteration_stats(values: &[u64]) -> Option<IterationStats> {
    if values.is_empty() {
        return None;
    }

    let samples = || values.iter().map(|&v| v as f64);
    let var: Variance = samples().collect();
    let min: Min = samples().collect();
    let max: Max = samples().collect();

    let mean = var.mean();
    let std_dev = var.population_variance().sqrt();
    let cv = if mean > 0.0 { std_dev / mean } else { 0.0 };

    Some(IterationStats {
        min: min.min(),
        max: max.max(),
        mean,
        std_dev,
        cv,
        count: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_counts_have_no_spread() {
        let s = iteration_stats(&[500, 500, 500, 500]).unwrap();
        assert_eq!((s.min, s.max, s.mean), (500.0, 500.0, 500.0));
        assert!(s.std_dev.abs() < 1e-9);
        assert!(s.cv.abs() < 1e-12);
        assert_eq!(s.count, 4);
    }

    #[test]
    fn spread_of_uneven_counts() {
        let s = iteration_stats(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!((s.min, s.max), (2.0, 9.0));
        assert!((s.mean - 5.0).abs() < 1e-9);
        assert!((s.std_dev - 2.0).abs() < 1e-9);
        assert!((s.cv - 0.4).abs() < 1e-9);
    }

    #[test]
    fn zero_mean_and_empty_input() {
        assert_eq!(iteration_stats(&[0, 0]).map(|s| s.cv), Some(0.0));
        assert!(iteration_stats(&[]).is_none());
    }
}
