//! Jain's fairness index over per-worker iteration counts.
//!
//! `(Σx)² / (n · Σx²)`: 1.0 when every worker did the same amount, 1/n when a
//! single worker did everything. See
//! https://en.wikipedia.org/wiki/Fairness_measure#Jain's_fairness_index

use crate::error::{BenchError, Result};

/// Fairness of integer iteration counts.
pub fn fairness(values: &[u64]) -> Result<f64> {
    let as_f64: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    jains_index(&as_f64)
}

/// Jain's index for non-negative samples.
///
/// Fails with `FairnessUndefined` when the input is empty or all zero.
/// Samples are scaled by their maximum first, so equal inputs of any magnitude give
/// exactly 1.0; the result is clamped to `(0, 1]` against residual rounding.
pub fn jains_index(values: &[f64]) -> Result<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if values.is_empty() || max <= 0.0 {
        return Err(BenchError::FairnessUndefined);
    }
    let sum: f64 = values.iter().map(|x| x / max).sum();
    let sum_sq: f64 = values.iter().map(|x| (x / max) * (x / max)).sum();
    Ok(((sum * sum) / (values.len() as f64 * sum_sq)).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn single_worker_is_perfectly_fair() {
        assert_eq!(fairness(&[1]).unwrap(), 1.0);
        assert_eq!(fairness(&[123_456_789]).unwrap(), 1.0);
    }

    #[test]
    fn even_split_is_one() {
        assert_eq!(fairness(&[500, 500, 500, 500]).unwrap(), 1.0);
    }

    #[test]
    fn large_equal_counts_are_exactly_one() {
        for n in [2, 3, 7, 64] {
            assert_eq!(fairness(&vec![100_000_001; n]).unwrap(), 1.0, "n={}", n);
            assert_eq!(fairness(&vec![123_456_789; n]).unwrap(), 1.0, "n={}", n);
        }
    }

    #[test]
    fn never_exceeds_one() {
        let counts = [100_000_001u64, 100_000_000, 100_000_002, 99_999_999];
        let f = fairness(&counts).unwrap();
        assert!(f <= 1.0 && f > 0.999_999);
    }

    #[test]
    fn one_dominant_worker_is_one_over_n() {
        assert!(close(fairness(&[1000, 0, 0, 0]).unwrap(), 0.25));
        assert!(close(fairness(&[7, 0]).unwrap(), 0.5));
    }

    #[test]
    fn uneven_split_lands_between() {
        // (1+2+3)^2 / (3 * 14) = 36 / 42
        let f = fairness(&[1, 2, 3]).unwrap();
        assert!(close(f, 36.0 / 42.0));
        assert!(f > 1.0 / 3.0 && f < 1.0);
    }

    #[test]
    fn index_is_scale_invariant() {
        let v = [3.0, 9.0, 4.0, 11.0, 1.0];
        let base = jains_index(&v).unwrap();
        for k in [0.5, 2.0, 17.0, 1e6] {
            let scaled: Vec<f64> = v.iter().map(|x| x * k).collect();
            assert!(close(jains_index(&scaled).unwrap(), base), "k={}", k);
        }
    }

    #[test]
    fn all_zero_or_empty_is_undefined() {
        assert!(matches!(fairness(&[0, 0, 0]), Err(BenchError::FairnessUndefined)));
        assert!(matches!(fairness(&[]), Err(BenchError::FairnessUndefined)));
    }
}
