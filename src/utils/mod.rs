pub mod affinity;
pub mod fairness;
pub mod metrics;
pub mod report;
