//! driver.rs
//! Runs one measured configuration: validate → allocate locks → spawn workers →
//! release them together → (time-boxed: sleep the window, raise stop) → join → aggregate.
//!
//! Locks, the stop flag and the start gate live on the driver's stack and are borrowed
//! by scoped worker threads; nothing outlives a single run.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};
use spin_sleep::{SpinSleeper, SpinStrategy};

use crate::config::{BenchmarkConfig, LockKind};
use crate::error::{BenchError, Result};
use crate::harness::{
    assignment::LockAssignment,
    lock_pool::{BenchLock, LockPool},
    worker::{StartGate, Worker, WorkerResult},
};
use crate::utils::{affinity, fairness::fairness};

const DRAIN_WARN: Duration = Duration::from_millis(250); // slow drain usually means oversubscription

/// Aggregate of one run, built only after every worker has joined.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub total_acquisitions: u64,
    /// One entry per worker, in worker-index order.
    pub per_worker_iterations: Vec<u64>,
    /// From the start gate opening to the last join.
    pub elapsed: Duration,
    /// Per worker, in worker-index order: gate opening to leaving the loop.
    pub per_worker_finish: Vec<Duration>,
    /// Time-boxed runs only: stop signal to last join.
    pub drain: Option<Duration>,
    pub checksum: f64,
}

impl RunResult {
    pub fn acquisitions_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_acquisitions as f64 / secs
        } else {
            0.0
        }
    }

    pub fn fairness(&self) -> Result<f64> {
        fairness(&self.per_worker_iterations)
    }

    /// Finish time of the slowest worker; never later than `elapsed`.
    pub fn slowest_worker(&self) -> Duration {
        self.per_worker_finish.iter().copied().max().unwrap_or_default()
    }
}

/// Validates `config` and runs it against the lock primitive it names.
pub fn run(config: &BenchmarkConfig) -> Result<RunResult> {
    match config.lock_kind {
        LockKind::ParkingLot => run_with::<parking_lot::Mutex<f64>>(config),
        LockKind::Fair => run_with::<parking_lot::FairMutex<f64>>(config),
        LockKind::Std => run_with::<std::sync::Mutex<f64>>(config),
    }
}

/// Same as [`run`], for an explicit lock type.
pub fn run_with<L: BenchLock>(config: &BenchmarkConfig) -> Result<RunResult> {
    config.validate()?;

    let n = config.num_threads;
    let pool: LockPool<L> = LockPool::new(config.num_locks);
    let stop = AtomicBool::new(false);
    let gate = StartGate::new();
    let assignment = LockAssignment::from_flag(config.random_locks);
    let cores = if config.pin_cores {
        affinity::core_ids()
    } else {
        Vec::new()
    };

    info!(
        "run start: threads={} locks={} assignment={:?} lock={} inside={} outside={} acq={} iters={}",
        n,
        config.num_locks,
        assignment,
        config.lock_kind,
        config.work_inside,
        config.work_outside,
        config.acquisitions_per_iteration,
        config.total_iters
    );

    let (joined, elapsed, drain) = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(n);

        for index in 0..n {
            let worker = Worker {
                index,
                config,
                pool: &pool,
                stop: &stop,
                gate: &gate,
                selector: assignment.selector(index, config.num_locks),
                core: cores.get(index % cores.len().max(1)).cloned(),
            };
            let spawned = thread::Builder::new()
                .name(format!("lock_worker_{}", index))
                .spawn_scoped(scope, move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!("failed to spawn worker {}: {}", index, e);
                    // Release the ones already waiting so the scope can join them.
                    gate.abort();
                    return Err(BenchError::RuntimeUnavailable(format!(
                        "could not spawn worker {} of {}: {}",
                        index, n, e
                    )));
                }
            }
        }

        // Workers measure their finish from this same instant.
        let start = gate.open();

        let stop_at = if config.is_time_boxed() {
            SpinSleeper::new(100_000)
                .with_spin_strategy(SpinStrategy::YieldThread)
                .sleep(config.measurement_window());
            stop.store(true, Ordering::Relaxed);
            Some(Instant::now())
        } else {
            None
        };

        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
        let end = Instant::now();
        Ok((joined, end.duration_since(start), stop_at.map(|s| end.duration_since(s))))
    })?;

    let mut results: Vec<WorkerResult> = Vec::with_capacity(n);
    for (index, outcome) in joined.into_iter().enumerate() {
        match outcome {
            Ok(result) => results.push(result),
            Err(_) => {
                return Err(BenchError::RuntimeUnavailable(format!(
                    "worker {} panicked",
                    index
                )));
            }
        }
    }

    if let Some(d) = drain {
        debug!("drain after stop signal: {:?}", d);
        if d > DRAIN_WARN {
            warn!("workers took {:?} to observe the stop signal ({} threads)", d, n);
        }
    }

    let per_worker_iterations: Vec<u64> = results.iter().map(|r| r.iterations).collect();
    let total_iterations: u64 = per_worker_iterations.iter().sum();
    let per_worker_finish: Vec<Duration> = results.iter().map(|r| r.finished).collect();
    let checksum = results.iter().map(|r| r.checksum).sum::<f64>() + pool.total_value();

    let result = RunResult {
        total_acquisitions: total_iterations * u64::from(config.acquisitions_per_iteration),
        per_worker_iterations,
        elapsed,
        per_worker_finish,
        drain,
        checksum,
    };
    debug_assert_eq!(result.per_worker_iterations.len(), n);
    debug_assert!(result.slowest_worker() <= result.elapsed);

    info!(
        "run finished: threads={} acquisitions={} elapsed={:?}",
        n, result.total_acquisitions, result.elapsed
    );
    debug!("checksum={}", result.checksum);
    Ok(result)
}
