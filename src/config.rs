//! Benchmark configuration: one immutable `BenchmarkConfig` per measured run,
//! plus the thread-count range swept by the binary.

use std::{fmt, ops::RangeInclusive, str::FromStr, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_WORK_INSIDE: u32 = 1;
pub const DEFAULT_WORK_OUTSIDE: u32 = 0;
pub const DEFAULT_NUM_LOCKS: usize = 1;
pub const DEFAULT_ACQUISITIONS: u32 = 1;
pub const DEFAULT_CALIBRATION_FACTOR: u64 = 1000; // measurement window in ms
pub const MIN_MEASUREMENT_WINDOW: Duration = Duration::from_millis(100);
pub const DEFAULT_THREADS: &str = "1-10";

/// Exclusive-lock primitive under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LockKind {
    /// `parking_lot::Mutex` (eventually fair, barging allowed)
    #[default]
    ParkingLot,
    /// `parking_lot::FairMutex` (hands the lock over on every unlock)
    Fair,
    /// `std::sync::Mutex`
    Std,
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LockKind::ParkingLot => "parking-lot",
            LockKind::Fair => "fair",
            LockKind::Std => "std",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub num_threads: usize,
    /// Dependent float additions performed while holding the lock.
    pub work_inside: u32,
    /// Dependent float additions performed before each acquisition.
    pub work_outside: u32,
    pub num_locks: usize,
    /// Pick a fresh random lock on every acquisition instead of `worker % num_locks`.
    pub random_locks: bool,
    pub acquisitions_per_iteration: u32,
    /// 0 = time-boxed run, otherwise every worker runs exactly this many iterations.
    pub total_iters: u64,
    /// Length of the time-boxed measurement window, in milliseconds.
    pub loop_pre_calibration_factor: u64,
    pub lock_kind: LockKind,
    pub pin_cores: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            num_threads: 1,
            work_inside: DEFAULT_WORK_INSIDE,
            work_outside: DEFAULT_WORK_OUTSIDE,
            num_locks: DEFAULT_NUM_LOCKS,
            random_locks: false,
            acquisitions_per_iteration: DEFAULT_ACQUISITIONS,
            total_iters: 0,
            loop_pre_calibration_factor: DEFAULT_CALIBRATION_FACTOR,
            lock_kind: LockKind::default(),
            pin_cores: false,
        }
    }
}

impl BenchmarkConfig {
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads,
            ..Self::default()
        }
    }

    pub fn with_work(mut self, inside: u32, outside: u32) -> Self {
        self.work_inside = inside;
        self.work_outside = outside;
        self
    }

    pub fn with_locks(mut self, num_locks: usize, random_locks: bool) -> Self {
        self.num_locks = num_locks;
        self.random_locks = random_locks;
        self
    }

    pub fn with_acquisitions(mut self, acquisitions: u32) -> Self {
        self.acquisitions_per_iteration = acquisitions;
        self
    }

    pub fn with_total_iters(mut self, total_iters: u64) -> Self {
        self.total_iters = total_iters;
        self
    }

    pub fn with_window_ms(mut self, ms: u64) -> Self {
        self.loop_pre_calibration_factor = ms;
        self
    }

    pub fn with_lock_kind(mut self, kind: LockKind) -> Self {
        self.lock_kind = kind;
        self
    }

    pub fn with_pinning(mut self, pin_cores: bool) -> Self {
        self.pin_cores = pin_cores;
        self
    }

    /// Same configuration for a different thread count.
    pub fn for_threads(&self, num_threads: usize) -> Self {
        Self {
            num_threads,
            ..self.clone()
        }
    }

    pub fn is_time_boxed(&self) -> bool {
        self.total_iters == 0
    }

    /// Time-boxed window: never shorter than `MIN_MEASUREMENT_WINDOW`.
    pub fn measurement_window(&self) -> Duration {
        Duration::from_millis(self.loop_pre_calibration_factor).max(MIN_MEASUREMENT_WINDOW)
    }

    /// Rejects every invalid combination before a run can start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_threads < 1 {
            return Err(ConfigError::NoThreads);
        }
        if self.num_locks < 1 {
            return Err(ConfigError::NoLocks);
        }
        if self.acquisitions_per_iteration < 1 {
            return Err(ConfigError::NoAcquisitions);
        }
        if self.random_locks && self.num_locks == 1 {
            return Err(ConfigError::RandomLocksNeedMultiple);
        }
        Ok(())
    }
}

/// Converts a signed command-line count, rejecting negatives and values `T` cannot hold.
pub fn non_negative<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T, ConfigError> {
    if value < 0 {
        return Err(ConfigError::Negative { field, value });
    }
    T::try_from(value).map_err(|_| ConfigError::OutOfRange { field, value })
}

/// Thread counts to sweep: `N` or `MIN-MAX` (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRange {
    pub min: usize,
    pub max: usize,
}

impl ThreadRange {
    pub fn iter(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

impl Default for ThreadRange {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl FromStr for ThreadRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidThreadRange(s.to_string());
        let parse = |part: &str| part.trim().parse::<usize>().map_err(|_| invalid());

        let (min, max) = match s.split_once('-') {
            Some((lo, hi)) => (parse(lo)?, parse(hi)?),
            None => {
                let n = parse(s)?;
                (n, n)
            }
        };
        if min < 1 || min > max {
            return Err(invalid());
        }
        Ok(Self { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_command_line_defaults() {
        let cfg = BenchmarkConfig::default();
        assert_eq!(cfg.work_inside, 1);
        assert_eq!(cfg.work_outside, 0);
        assert_eq!(cfg.num_locks, 1);
        assert_eq!(cfg.acquisitions_per_iteration, 1);
        assert!(cfg.is_time_boxed());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_combinations() {
        assert_eq!(BenchmarkConfig::new(0).validate(), Err(ConfigError::NoThreads));
        assert_eq!(
            BenchmarkConfig::new(2).with_locks(0, false).validate(),
            Err(ConfigError::NoLocks)
        );
        assert_eq!(
            BenchmarkConfig::new(2).with_acquisitions(0).validate(),
            Err(ConfigError::NoAcquisitions)
        );
        assert_eq!(
            BenchmarkConfig::new(2).with_locks(1, true).validate(),
            Err(ConfigError::RandomLocksNeedMultiple)
        );
        assert!(BenchmarkConfig::new(2).with_locks(2, true).validate().is_ok());
    }

    #[test]
    fn window_has_a_floor() {
        let short = BenchmarkConfig::new(1).with_window_ms(0);
        assert_eq!(short.measurement_window(), MIN_MEASUREMENT_WINDOW);
        let long = BenchmarkConfig::new(1).with_window_ms(1500);
        assert_eq!(long.measurement_window(), Duration::from_millis(1500));
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert_eq!(non_negative::<u32>("work-inside", 3), Ok(3));
        assert_eq!(
            non_negative::<u32>("work-inside", -1),
            Err(ConfigError::Negative { field: "work-inside", value: -1 })
        );
    }

    #[test]
    fn oversized_counts_are_out_of_range() {
        assert_eq!(
            non_negative::<u32>("work-inside", 5_000_000_000),
            Err(ConfigError::OutOfRange { field: "work-inside", value: 5_000_000_000 })
        );
        assert_eq!(non_negative::<u32>("work-inside", u32::MAX as i64), Ok(u32::MAX));
        assert_eq!(non_negative::<u64>("total-iters", 5_000_000_000), Ok(5_000_000_000));
    }

    #[test]
    fn parses_thread_ranges() {
        assert_eq!("4".parse::<ThreadRange>(), Ok(ThreadRange { min: 4, max: 4 }));
        assert_eq!("2-8".parse::<ThreadRange>(), Ok(ThreadRange { min: 2, max: 8 }));
        assert_eq!(DEFAULT_THREADS.parse::<ThreadRange>(), Ok(ThreadRange::default()));
        assert!("0".parse::<ThreadRange>().is_err());
        assert!("8-2".parse::<ThreadRange>().is_err());
        assert!("x-3".parse::<ThreadRange>().is_err());
        assert_eq!("3-5".parse::<ThreadRange>().map(|r| r.iter().count()), Ok(3));
    }
}
