//! Optional core pinning for benchmark workers, and a CPU oversubscription check.

use core_affinity::{CoreId, get_core_ids, set_for_current};
use log::{debug, warn};

/// Cores available for pinning; empty (with a warning) if the platform reports none.
pub fn core_ids() -> Vec<CoreId> {
    let cores = get_core_ids().unwrap_or_default();
    if cores.is_empty() {
        warn!("core pinning requested but no core ids are available; running unpinned");
    }
    cores
}

/// Pins the calling worker thread. Failure is logged, never fatal.
pub fn pin_current(worker: usize, core: CoreId) {
    if set_for_current(core) {
        debug!("worker {}: pinned to core {:?}", worker, core);
    } else {
        warn!("worker {}: failed to set affinity to core {:?}", worker, core);
    }
}

/// Warns when the sweep asks for more threads than logical CPUs.
pub fn check_oversubscription(max_threads: usize) {
    let cpus = num_cpus::get();
    if max_threads > cpus {
        warn!(
            "{} threads requested but only {} logical CPUs; results above {} threads measure the scheduler too",
            max_threads, cpus, cpus
        );
    }
}
