//! # lockbench
//! Mutex contention benchmark: throughput and Jain's fairness of an exclusive lock
//! primitive under configurable contention.
//!
//! ## Modes
//! - **Time-boxed** (`total_iters == 0`): workers run until the driver raises a shared
//!   stop flag after the measurement window.
//! - **Fixed-iteration**: every worker runs exactly `total_iters` iterations; the run
//!   lasts until the slowest worker finishes, so starvation shows up as wall time.
//!
//! ## Layout
//! - `harness`: work simulator, lock pool, lock assignment, worker loop, driver.
//! - `utils`: fairness index, iteration statistics, core pinning, report rows.

pub mod config;
pub mod error;
pub mod harness;
pub mod utils;

pub use config::{BenchmarkConfig, LockKind, ThreadRange};
pub use error::{BenchError, ConfigError, Result};
pub use harness::driver::{RunResult, run, run_with};
pub use utils::fairness::{fairness, jains_index};
