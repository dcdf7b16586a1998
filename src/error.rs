//! Error taxonomy for the lock benchmark.
//!
//! - **Config:** invalid flag combination, detected before any worker thread exists.
//! - **RuntimeUnavailable:** threads could not be spawned; the run is abandoned.
//! - **FairnessUndefined:** every worker finished with zero iterations.
//! - **Output:** the report could not be written to stdout.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("num_threads must be at least 1")]
    NoThreads,
    #[error("num_locks must be at least 1")]
    NoLocks,
    #[error("acquisitions per iteration must be at least 1")]
    NoAcquisitions,
    #[error("--random-locks requires --num-locks > 1")]
    RandomLocksNeedMultiple,
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} is too large (got {value})")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("invalid thread range '{0}': expected N or MIN-MAX with 1 <= MIN <= MAX")]
    InvalidThreadRange(String),
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("runtime unavailable: {0}")]
    RuntimeUnavailable(String),
    #[error("fairness undefined: no worker completed an iteration")]
    FairnessUndefined,
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

impl BenchError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            BenchError::Config(_) => 2,
            BenchError::RuntimeUnavailable(_)
            | BenchError::FairnessUndefined
            | BenchError::Output(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_two() {
        let err: BenchError = ConfigError::RandomLocksNeedMultiple.into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("--num-locks > 1"));
    }

    #[test]
    fn runtime_failures_exit_with_one() {
        let err = BenchError::RuntimeUnavailable("no threads left".into());
        assert_eq!(err.exit_code(), 1);
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        assert!(matches!(BenchError::from(io), BenchError::Output(_)));
    }
}
