//! lock_pool.rs
//! The exclusive locks under test.
//!
//! Each lock guards one `f64` that the inside-work chain mutates, so the critical
//! section really touches shared state. Slots are cache-line padded: two adjacent
//! locks never share a line, which would otherwise add false-sharing traffic that
//! has nothing to do with the primitive being measured.

use crossbeam::utils::CachePadded;

/// Minimal surface the benchmark needs from a lock primitive.
pub trait BenchLock: Send + Sync {
    fn new(value: f64) -> Self;

    /// Acquires (blocking, no timeout), runs `f` on the guarded value, releases.
    fn with_lock<R>(&self, f: impl FnOnce(&mut f64) -> R) -> R;
}

impl BenchLock for parking_lot::Mutex<f64> {
    fn new(value: f64) -> Self {
        parking_lot::Mutex::new(value)
    }

    #[inline]
    fn with_lock<R>(&self, f: impl FnOnce(&mut f64) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }
}

impl BenchLock for parking_lot::FairMutex<f64> {
    fn new(value: f64) -> Self {
        parking_lot::FairMutex::new(value)
    }

    #[inline]
    fn with_lock<R>(&self, f: impl FnOnce(&mut f64) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }
}

impl BenchLock for std::sync::Mutex<f64> {
    fn new(value: f64) -> Self {
        std::sync::Mutex::new(value)
    }

    // A poisoned lock still counts as acquired; the guarded float has no invariant.
    #[inline]
    fn with_lock<R>(&self, f: impl FnOnce(&mut f64) -> R) -> R {
        let mut guard = self.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut *guard)
    }
}

/// `num_locks` independent locks, owned by the driver for a single run.
pub struct LockPool<L: BenchLock> {
    locks: Vec<CachePadded<L>>,
}

impl<L: BenchLock> LockPool<L> {
    pub fn new(num_locks: usize) -> Self {
        let locks = (0..num_locks).map(|_| CachePadded::new(L::new(0.0))).collect();
        Self { locks }
    }

    /// Lock at `index`; callers keep `index` below the lock count.
    #[inline]
    pub fn get(&self, index: usize) -> &L {
        &self.locks[index]
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }

    /// Sum of all guarded values (read after every worker has joined).
    pub fn total_value(&self) -> f64 {
        self.locks.iter().map(|l| l.with_lock(|v| *v)).sum()
    }
}
