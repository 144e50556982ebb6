use serde::{Deserialize, Serialize};

/// Physical parameters of one run, fixed for the lifetime of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Nearest-neighbor coupling `J`.
    #[serde(rename = "J")]
    pub j: f64,
    /// External field `H`.
    #[serde(rename = "H")]
    pub h: f64,
    /// Inverse temperature.
    pub beta: f64,
}

impl ModelParams {
    pub fn new(j: f64, h: f64, beta: f64) -> Self {
        Self { j, h, beta }
    }

    /// `1 / beta`, infinite at `beta == 0`.
    pub fn temperature(&self) -> f64 {
        1.0 / self.beta
    }
}
