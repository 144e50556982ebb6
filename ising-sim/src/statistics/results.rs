use serde::Serialize;

use super::Statistics;
use crate::mcmc::Observation;

/// Observables of one job, averaged over the measurement samples.
///
/// Energy and magnetization are per site (`e = E / N`, `m = M / N`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of samples taken after warmup.
    pub samples: usize,
    /// Accepted flips over attempted steps, warmup included.
    pub acceptance_rate: f64,
    /// ⟨e⟩.
    pub energy: f64,
    /// ⟨e²⟩.
    pub energy2: f64,
    /// ⟨m⟩.
    pub mag: f64,
    /// ⟨|m|⟩.
    pub abs_mag: f64,
    /// ⟨m²⟩.
    pub mag2: f64,
    /// ⟨m⁴⟩.
    pub mag4: f64,
    /// Specific heat per site, `β²·N·(⟨e²⟩ − ⟨e⟩²)`.
    pub specific_heat: f64,
    /// Susceptibility per site, `β·N·(⟨m²⟩ − ⟨|m|⟩²)`.
    pub susceptibility: f64,
    /// `1 − ⟨m⁴⟩ / (3⟨m²⟩²)`, zero when `⟨m²⟩ = 0`.
    pub binder_cumulant: f64,
}

/// Collects per-site observables during a run.
pub struct SummaryAccum {
    size: usize,
    beta: f64,
    energy: Statistics,
    energy2: Statistics,
    mag: Statistics,
    abs_mag: Statistics,
    mag2: Statistics,
    mag4: Statistics,
}

impl SummaryAccum {
    pub fn new(size: usize, beta: f64) -> Self {
        Self {
            size,
            beta,
            energy: Statistics::new(1),
            energy2: Statistics::new(2),
            mag: Statistics::new(1),
            abs_mag: Statistics::new(1),
            mag2: Statistics::new(2),
            mag4: Statistics::new(4),
        }
    }

    pub fn push(&mut self, obs: &Observation) {
        let e = obs.energy_per_site();
        let m = obs.magnetization_per_site();
        self.energy.update(e);
        self.energy2.update(e);
        self.mag.update(m);
        self.abs_mag.update(m.abs());
        self.mag2.update(m);
        self.mag4.update(m);
    }

    pub fn finish(self, accepted: usize, attempted: usize) -> RunSummary {
        let n = self.size as f64;
        let (e, e2) = (self.energy.average(), self.energy2.average());
        let (abs_m, m2, m4) = (
            self.abs_mag.average(),
            self.mag2.average(),
            self.mag4.average(),
        );
        let binder_cumulant = if m2 > 0.0 {
            1.0 - m4 / (3.0 * m2 * m2)
        } else {
            0.0
        };
        RunSummary {
            samples: self.energy.count,
            acceptance_rate: if attempted == 0 {
                0.0
            } else {
                accepted as f64 / attempted as f64
            },
            energy: e,
            energy2: e2,
            mag: self.mag.average(),
            abs_mag: abs_m,
            mag2: m2,
            mag4: m4,
            specific_heat: self.beta * self.beta * n * (e2 - e * e),
            susceptibility: self.beta * n * (m2 - abs_m * abs_m),
            binder_cumulant,
        }
    }
}
