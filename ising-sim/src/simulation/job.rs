use serde::Serialize;

use crate::spins::ModelParams;
use crate::statistics::RunSummary;

/// One point of a parameter sweep: a fresh lattice of the given shape,
/// simulated with its own generator seeded from `seed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub rows: usize,
    pub cols: usize,
    #[serde(flatten)]
    pub params: ModelParams,
    pub seed: u64,
}

impl Job {
    pub fn new(rows: usize, cols: usize, params: ModelParams, seed: u64) -> Self {
        Self {
            rows,
            cols,
            params,
            seed,
        }
    }
}

/// Outcome of [`run_job`](super::run_job).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobResult {
    #[serde(flatten)]
    pub job: Job,
    pub steps: usize,
    pub accepted: usize,
    /// Total energy after the last step.
    pub final_energy: f64,
    /// Total magnetization after the last step.
    pub final_magnetization: i64,
    pub summary: RunSummary,
}
