//! work.rs
//! Calibrated busy work: a chain of dependent floating-point additions.
//!
//! Every step reads the previous step's output, so the CPU cannot overlap them and
//! the compiler cannot fold the loop. The running value (`carry`) is handed back
//! to the driver in the worker's result, which keeps the chain observable.

/// Per-worker dependency chain.
#[derive(Debug, Clone, Copy)]
pub struct WorkSimulator {
    carry: f64,
}

impl Default for WorkSimulator {
    fn default() -> Self {
        Self { carry: 1.0 }
    }
}

impl WorkSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Performs `units` dependent additions on `slot`.
    ///
    /// Inside the critical section `slot` is the value guarded by the held lock;
    /// outside it is the worker's private accumulator.
    #[inline]
    pub fn spin(&mut self, slot: &mut f64, units: u32) {
        for _ in 0..units {
            *slot += self.carry;
            self.carry = *slot;
        }
    }

    /// Final value of the chain.
    pub fn carry(&self) -> f64 {
        self.carry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_step_feeds_the_next() {
        let mut sim = WorkSimulator::new();
        let mut slot = 0.0;
        sim.spin(&mut slot, 3);
        // 0+1=1, 1+1=2, 2+2=4
        assert_eq!(slot, 4.0);
        assert_eq!(sim.carry(), 4.0);
    }

    #[test]
    fn zero_units_is_a_no_op() {
        let mut sim = WorkSimulator::new();
        let mut slot = 7.0;
        sim.spin(&mut slot, 0);
        assert_eq!(slot, 7.0);
        assert_eq!(sim.carry(), 1.0);
    }

    #[test]
    fn chain_continues_across_calls_and_slots() {
        let mut sim = WorkSimulator::new();
        let mut shared = 0.0;
        let mut local = 0.0;
        sim.spin(&mut shared, 1); // shared=1, carry=1
        sim.spin(&mut local, 2); // local=1, carry=1; local=2, carry=2
        sim.spin(&mut shared, 1); // shared=3, carry=3
        assert_eq!((shared, local, sim.carry()), (3.0, 2.0, 3.0));
    }
}
