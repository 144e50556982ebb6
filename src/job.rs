use std::path::Path;

use anyhow::{Context, Result};
use ising_sim::{Job, ModelParams, SimConfig};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A scannable parameter: one value or a list of values to sweep over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scan {
    One(f64),
    Many(Vec<f64>),
}

impl Scan {
    pub fn values(&self) -> &[f64] {
        match self {
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(vs) => vs,
        }
    }
}

fn validate_scan(scan: &Scan) -> Result<(), ValidationError> {
    let values = scan.values();
    if values.is_empty() {
        return Err(ValidationError::new("scan must contain at least one value"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::new("scan values must be finite"));
    }
    Ok(())
}

fn validate_job_file(file: &JobFile) -> Result<(), ValidationError> {
    if file.warmup > file.steps {
        return Err(ValidationError::new("warmup must be <= steps"));
    }
    Ok(())
}

/// JSON job description.
///
/// ```json
/// { "rows": 20, "cols": 20, "J": 1.0, "H": [0.0, 0.1], "beta": [0.3, 0.5], "steps": 30000 }
/// ```
///
/// Missing fields take the defaults of [`JobFile::default`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
#[validate(schema(function = "validate_job_file"))]
pub struct JobFile {
    #[validate(range(min = 1))]
    pub rows: usize,
    #[validate(range(min = 1))]
    pub cols: usize,
    #[serde(rename = "J")]
    #[validate(custom = "validate_scan")]
    pub j: Scan,
    #[serde(rename = "H")]
    #[validate(custom = "validate_scan")]
    pub h: Scan,
    #[validate(custom = "validate_scan")]
    pub beta: Scan,
    pub steps: usize,
    pub warmup: usize,
    #[validate(range(min = 1))]
    pub measure_interval: usize,
    /// Write one trajectory line every this many steps.
    #[validate(range(min = 1))]
    pub report_interval: usize,
    pub seed: Option<u64>,
}

impl Default for JobFile {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            j: Scan::One(1.0),
            h: Scan::One(0.0),
            beta: Scan::One(5.0),
            steps: 30_000,
            warmup: 0,
            measure_interval: 1,
            report_interval: 1,
            seed: None,
        }
    }
}

impl JobFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read job file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid job file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let file: Self = serde_json::from_str(contents)?;
        file.validate()?;
        Ok(file)
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            n_steps: self.steps,
            warmup_steps: self.warmup,
            measure_interval: self.measure_interval,
        }
    }

    /// Expand the scans into one job per `(J, H, beta)` combination.
    ///
    /// Order is J-major, then H, then beta. Job `i` is seeded `base_seed + i`.
    pub fn jobs(&self, base_seed: u64) -> Vec<Job> {
        let mut jobs = Vec::new();
        for &j in self.j.values() {
            for &h in self.h.values() {
                for &beta in self.beta.values() {
                    let seed = base_seed.wrapping_add(jobs.len() as u64);
                    jobs.push(Job::new(
                        self.rows,
                        self.cols,
                        ModelParams::new(j, h, beta),
                        seed,
                    ));
                }
            }
        }
        jobs
    }
}
