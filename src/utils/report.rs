//! Report rows: one per swept thread count.
//!
//! Two renderings: the aligned table (default) and CSV on stdout (`--csv`).
//! Nothing is written to disk.

use std::io::Write;

use serde::Serialize;

use crate::harness::driver::RunResult;
use crate::utils::metrics::iteration_stats;

const FAIRNESS_UNDEFINED: &str = "n/a";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportRow {
    pub threads: usize,
    pub acquisitions_khz: f64,
    /// `None` when every worker finished with zero iterations.
    pub fairness: Option<f64>,
    /// Fixed-iteration runs only.
    pub wall_ms: Option<f64>,
    pub min_iters: f64,
    pub max_iters: f64,
    pub mean_iters: f64,
    /// Population standard deviation of per-worker iterations.
    pub std_dev_iters: f64,
    pub cv_iters: f64,
}

impl ReportRow {
    pub fn from_run(threads: usize, run: &RunResult, show_wall: bool) -> Self {
        let stats = iteration_stats(&run.per_worker_iterations);
        Self {
            threads,
            acquisitions_khz: run.acquisitions_per_sec() / 1000.0,
            fairness: run.fairness().ok(),
            wall_ms: show_wall.then(|| run.elapsed.as_secs_f64() * 1e3),
            min_iters: stats.map_or(0.0, |s| s.min),
            max_iters: stats.map_or(0.0, |s| s.max),
            mean_iters: stats.map_or(0.0, |s| s.mean),
            std_dev_iters: stats.map_or(0.0, |s| s.std_dev),
            cv_iters: stats.map_or(0.0, |s| s.cv),
        }
    }
}

pub fn format_header(show_wall: bool) -> String {
    let mut header = format!("{:<10}{:>12}{:>10}", "Threads", "Acq (kHz)", "Fairness");
    if show_wall {
        header.push_str(&format!("{:>12}", "Wall (ms)"));
    }
    header
}

pub fn format_row(row: &ReportRow) -> String {
    let fairness = match row.fairness {
        Some(f) => format!("{:>10.2}", f),
        None => format!("{:>10}", FAIRNESS_UNDEFINED),
    };
    let mut line = format!("{:<10}{:>12.0}{}", row.threads, row.acquisitions_khz, fairness);
    if let Some(ms) = row.wall_ms {
        line.push_str(&format!("{:>12.1}", ms));
    }
    line
}

/// Where rows go as they are produced.
pub enum ReportSink<W: Write> {
    Table { out: W, show_wall: bool },
    Csv(csv::Writer<W>),
}

impl<W: Write> ReportSink<W> {
    pub fn table(out: W, show_wall: bool) -> Self {
        ReportSink::Table { out, show_wall }
    }

    pub fn csv(out: W) -> Self {
        ReportSink::Csv(csv::Writer::from_writer(out))
    }

    /// Table header; CSV headers come from the first serialized row.
    pub fn begin(&mut self) -> std::io::Result<()> {
        match self {
            ReportSink::Table { out, show_wall } => writeln!(out, "{}", format_header(*show_wall)),
            ReportSink::Csv(_) => Ok(()),
        }
    }

    pub fn write_row(&mut self, row: &ReportRow) -> std::io::Result<()> {
        match self {
            ReportSink::Table { out, .. } => {
                writeln!(out, "{}", format_row(row))?;
                out.flush()
            }
            ReportSink::Csv(wtr) => {
                wtr.serialize(row).map_err(std::io::Error::other)?;
                wtr.flush()
            }
        }
    }
}
