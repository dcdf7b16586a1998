// Lock contention harness
// Drives worker threads against a pool of exclusive locks, with calibrated busy work
// inside and outside the critical section, and collects per-worker iteration counts.

pub mod assignment;
pub mod driver;
pub mod lock_pool;
pub mod work;
pub mod worker;
