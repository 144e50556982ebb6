use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.warmup_steps > cfg.n_steps {
        return Err(ValidationError::new("warmup_steps must be <= n_steps"));
    }
    if cfg.measure_interval < 1 {
        return Err(ValidationError::new("measure_interval must be >= 1"));
    }
    Ok(())
}

/// Step schedule shared by every job of a sweep.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    /// Metropolis steps per job. Each step visits one random site.
    pub n_steps: usize,
    /// Steps discarded before observables are accumulated.
    pub warmup_steps: usize,
    /// Sample observables every this many steps after warmup.
    pub measure_interval: usize,
}

impl SimConfig {
    pub fn new(n_steps: usize) -> Self {
        Self {
            n_steps,
            warmup_steps: 0,
            measure_interval: 1,
        }
    }
}
