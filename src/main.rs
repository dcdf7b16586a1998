//! # lockbench entry point
//! Sweeps a range of thread counts and prints one row per count:
//! acquisitions per second (kHz), Jain's fairness, and wall time for fixed-iteration runs.
//!
//! ## Reading the numbers
//! - **Acq (kHz):** total lock acquisitions per second, in thousands. The 1-thread row is
//!   the uncontended fast path, which dominates most real programs.
//! - **Fairness:** 1.0 means every thread got the lock equally often; 1/N means one
//!   thread took it every time. `n/a` means no thread completed an iteration.
//! - **Wall (ms):** with `--total-iters`, time until the slowest thread finished.
//!
//! Every configuration in the sweep is validated before the first run starts.
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=info`).

use std::{io::stdout, process::ExitCode};

use clap::Parser;
use log::{error, info};

use lockbench::{
    BenchError, BenchmarkConfig, LockKind, ThreadRange,
    config::{DEFAULT_CALIBRATION_FACTOR, DEFAULT_THREADS, non_negative},
    harness::driver,
    utils::{
        affinity::check_oversubscription,
        report::{ReportRow, ReportSink},
    },
};

#[derive(Debug, Parser)]
#[command(name = "lockbench", about = "Benchmark exclusive locks with short critical sections")]
struct Cli {
    /// Units of work inside the critical section (dependent float additions)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    work_inside: i64,

    /// Units of work outside the critical section
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    work_outside: i64,

    /// Number of independent locks; threads are assigned round-robin
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    num_locks: i64,

    /// Pick a random lock per acquisition (requires --num-locks > 1)
    #[arg(long)]
    random_locks: bool,

    /// Lock acquisitions per loop iteration
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    acquisitions: i64,

    /// Fixed iterations per thread (0 = time-boxed)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    total_iters: i64,

    /// Measurement window for time-boxed runs, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CALIBRATION_FACTOR as i64, allow_negative_numbers = true)]
    time_ms: i64,

    /// Lock primitive under test
    #[arg(long, value_enum, default_value_t = LockKind::ParkingLot)]
    lock: LockKind,

    /// Pin worker i to core i mod cores
    #[arg(long)]
    pin_cores: bool,

    /// Emit rows as CSV on stdout instead of the aligned table
    #[arg(long)]
    csv: bool,

    /// Number of threads: N or MIN-MAX
    #[arg(default_value = DEFAULT_THREADS)]
    threads: String,
}

impl Cli {
    /// Template configuration; `num_threads` is filled per sweep step.
    fn to_config(&self) -> Result<BenchmarkConfig, BenchError> {
        let config = BenchmarkConfig::new(1)
            .with_work(
                non_negative("work-inside", self.work_inside)?,
                non_negative("work-outside", self.work_outside)?,
            )
            .with_locks(non_negative("num-locks", self.num_locks)?, self.random_locks)
            .with_acquisitions(non_negative("acquisitions", self.acquisitions)?)
            .with_total_iters(non_negative("total-iters", self.total_iters)?)
            .with_window_ms(non_negative("time-ms", self.time_ms)?)
            .with_lock_kind(self.lock)
            .with_pinning(self.pin_cores);
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run_sweep(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("lockbench: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_sweep(cli: &Cli) -> Result<(), BenchError> {
    let threads: ThreadRange = cli.threads.parse()?;
    let template = cli.to_config()?;

    // Fail fast: nothing runs unless every step of the sweep is valid.
    let configs: Vec<BenchmarkConfig> = threads.iter().map(|n| template.for_threads(n)).collect();
    for config in &configs {
        config.validate()?;
    }

    check_oversubscription(threads.max);
    info!("sweeping threads {}..={} with lock={}", threads.min, threads.max, template.lock_kind);

    let show_wall = !template.is_time_boxed();
    let mut sink = if cli.csv {
        ReportSink::csv(stdout().lock())
    } else {
        ReportSink::table(stdout().lock(), show_wall)
    };
    sink.begin()?;

    for config in &configs {
        let result = driver::run(config)?;
        let row = ReportRow::from_run(config.num_threads, &result, show_wall);
        info!(
            "threads={} iters min={:.0} max={:.0} mean={:.1} std_dev={:.1} cv={:.3}",
            row.threads, row.min_iters, row.max_iters, row.mean_iters, row.std_dev_iters, row.cv_iters
        );
        sink.write_row(&row)?;
    }
    Ok(())
}
