//! assignment.rs
//! Which lock a worker takes on each acquisition.
//!
//! - **Fixed:** `worker_index % num_locks`, decided once (static partitioning).
//! - **Random:** uniform draw per acquisition from a per-worker generator.

use rand::{Rng, SeedableRng, rngs::SmallRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAssignment {
    Fixed,
    Random,
}

impl LockAssignment {
    pub fn from_flag(random_locks: bool) -> Self {
        if random_locks {
            LockAssignment::Random
        } else {
            LockAssignment::Fixed
        }
    }

    /// Builds the selector one worker uses for the whole run.
    pub fn selector(self, worker_index: usize, num_locks: usize) -> LockSelector {
        match self {
            LockAssignment::Fixed => LockSelector::Fixed(worker_index % num_locks),
            LockAssignment::Random => LockSelector::Random {
                // Seeded from the thread-local generator so workers draw independent streams.
                rng: SmallRng::from_rng(&mut rand::rng()),
                num_locks,
            },
        }
    }
}

/// Per-worker lock chooser; never shared between threads.
#[derive(Debug)]
pub enum LockSelector {
    Fixed(usize),
    Random { rng: SmallRng, num_locks: usize },
}

impl LockSelector {
    /// Lock index for the next acquisition, always in `[0, num_locks)`.
    #[inline]
    pub fn next_index(&mut self) -> usize {
        match self {
            LockSelector::Fixed(index) => *index,
            LockSelector::Random { rng, num_locks } => rng.random_range(0..*num_locks),
        }
    }
}
