//! worker.rs
//! One benchmark thread and the gate that releases all of them at once.
//!
//! Loop per iteration (repeated `acquisitions_per_iteration` times):
//! outside work → pick lock → acquire → inside work → release.
//! The iteration counter is private to the worker and handed to the driver through
//! the thread's join value, so no counter is ever shared.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use core_affinity::CoreId;
use log::trace;
use parking_lot::{Condvar, Mutex};

use crate::config::BenchmarkConfig;
use crate::harness::{
    assignment::LockSelector,
    lock_pool::{BenchLock, LockPool},
    work::WorkSimulator,
};
use crate::utils::affinity::pin_current;

/// Terminal state of one worker, moved to the driver on join.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorkerResult {
    pub iterations: u64,
    /// Time from the gate opening to this worker leaving its loop.
    pub finished: Duration,
    /// Final accumulator of the worker's work chain.
    pub checksum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Closed,
    Open(Instant),
    Aborted,
}

/// Holds spawned workers until the driver has every thread up.
pub struct StartGate {
    state: Mutex<GateState>,
    cv: Condvar,
}

impl StartGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Closed),
            cv: Condvar::new(),
        }
    }

    /// Blocks until released. Returns the opening instant, or `None` if the run was aborted.
    pub fn wait(&self) -> Option<Instant> {
        let mut state = self.state.lock();
        while *state == GateState::Closed {
            self.cv.wait(&mut state);
        }
        match *state {
            GateState::Open(at) => Some(at),
            _ => None,
        }
    }

    /// Releases every waiter; the returned instant is the run's time origin.
    pub fn open(&self) -> Instant {
        let at = Instant::now();
        self.release(GateState::Open(at));
        at
    }

    pub fn abort(&self) {
        self.release(GateState::Aborted);
    }

    fn release(&self, next: GateState) {
        *self.state.lock() = next;
        self.cv.notify_all();
    }
}

/// Everything one worker borrows from the driver, plus its own lock selector.
pub struct Worker<'a, L: BenchLock> {
    pub index: usize,
    pub config: &'a BenchmarkConfig,
    pub pool: &'a LockPool<L>,
    pub stop: &'a AtomicBool,
    pub gate: &'a StartGate,
    pub selector: LockSelector,
    pub core: Option<CoreId>,
}

impl<L: BenchLock> Worker<'_, L> {
    pub fn run(mut self) -> WorkerResult {
        if let Some(core) = self.core {
            pin_current(self.index, core);
        }
        let Some(opened) = self.gate.wait() else {
            return WorkerResult::default();
        };

        let work_inside = self.config.work_inside;
        let work_outside = self.config.work_outside;
        let acquisitions = self.config.acquisitions_per_iteration;
        let target = self.config.total_iters;

        let mut sim = WorkSimulator::new();
        let mut local = 0.0;
        let mut iterations: u64 = 0;

        loop {
            if target > 0 {
                if iterations >= target {
                    break;
                }
            } else if self.stop.load(Ordering::Relaxed) {
                break;
            }

            for _ in 0..acquisitions {
                sim.spin(&mut local, work_outside);
                let lock = self.pool.get(self.selector.next_index());
                lock.with_lock(|value| sim.spin(value, work_inside));
            }
            iterations += 1;
        }

        let finished = opened.elapsed();
        trace!("worker {} done after {} iterations in {:?}", self.index, iterations, finished);
        WorkerResult {
            iterations,
            finished,
            checksum: local + sim.carry(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::assignment::LockAssignment;
    use std::{sync::Arc, thread};

    #[test]
    fn gate_releases_every_waiter() {
        let gate = Arc::new(StartGate::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let g = gate.clone();
                thread::spawn(move || g.wait())
            })
            .collect();
        thread::sleep(Duration::from_millis(10));
        let opened = gate.open();
        for w in waiters {
            assert_eq!(w.join().unwrap(), Some(opened));
        }
    }

    #[test]
    fn aborted_gate_reports_false() {
        let gate = StartGate::new();
        gate.abort();
        assert_eq!(gate.wait(), None);
    }

    #[test]
    fn fixed_target_runs_exact_iterations() {
        let config = BenchmarkConfig::new(1)
            .with_total_iters(25)
            .with_acquisitions(3)
            .with_work(2, 1);
        let pool: LockPool<parking_lot::Mutex<f64>> = LockPool::new(1);
        let stop = AtomicBool::new(false);
        let gate = StartGate::new();
        let opened = gate.open();

        let worker = Worker {
            index: 0,
            config: &config,
            pool: &pool,
            stop: &stop,
            gate: &gate,
            selector: LockAssignment::Fixed.selector(0, 1),
            core: None,
        };
        let result = worker.run();
        assert_eq!(result.iterations, 25);
        assert!(result.finished <= opened.elapsed());
        assert!(pool.total_value() > 0.0);
    }

    #[test]
    fn raised_stop_flag_ends_time_boxed_worker() {
        let config = BenchmarkConfig::new(1);
        let pool: LockPool<parking_lot::Mutex<f64>> = LockPool::new(1);
        let stop = AtomicBool::new(true);
        let gate = StartGate::new();
        gate.open();

        let worker = Worker {
            index: 0,
            config: &config,
            pool: &pool,
            stop: &stop,
            gate: &gate,
            selector: LockAssignment::Fixed.selector(0, 1),
            core: None,
        };
        assert_eq!(worker.run().iterations, 0);
    }
}
