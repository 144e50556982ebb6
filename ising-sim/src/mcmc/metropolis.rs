use std::convert::Infallible;

use super::UniformSource;
use crate::spins::Lattice;

/// Observables reported after each step of [`Metropolis::run_observed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Zero-based index of the step that just completed.
    pub step: usize,
    /// Number of sites in the lattice.
    pub size: usize,
    /// Total energy.
    pub energy: f64,
    /// Sum of all spins.
    pub magnetization: i64,
    pub beta: f64,
}

impl Observation {
    pub fn of(step: usize, lattice: &Lattice) -> Self {
        Self {
            step,
            size: lattice.size(),
            energy: lattice.energy(),
            magnetization: lattice.magnetization(),
            beta: lattice.params().beta,
        }
    }

    pub fn temperature(&self) -> f64 {
        1.0 / self.beta
    }

    pub fn energy_per_site(&self) -> f64 {
        self.energy / self.size as f64
    }

    pub fn magnetization_per_site(&self) -> f64 {
        self.magnetization as f64 / self.size as f64
    }
}

/// Single-spin-flip Metropolis engine.
///
/// Owns the variate source. Every call mutates at most one site of the
/// lattice it is given, and each step computes its delta before committing.
pub struct Metropolis<S> {
    source: S,
}

impl<S: UniformSource> Metropolis<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Propose flipping `(row, col)` and apply the Metropolis criterion.
    ///
    /// Downhill moves are accepted without a draw. Any other move, including
    /// `delta == 0`, draws `r` and is accepted iff `r < exp(-beta * delta)`.
    /// A neutral move is accepted after its draw even when `beta` is infinite,
    /// where `-beta * 0` would be NaN. Returns whether the flip was committed.
    #[inline]
    pub fn step(&mut self, lattice: &mut Lattice, row: isize, col: isize) -> bool {
        let delta = lattice.flip_delta(row, col);
        let accept = if delta < 0.0 {
            true
        } else {
            let r = self.source.next_uniform();
            delta == 0.0 || r < (-lattice.params().beta * delta).exp()
        };
        if accept {
            lattice.flip(row, col);
        }
        accept
    }

    /// Pick a uniformly random site (row first, then column) and step it.
    #[inline]
    pub fn sweep_step(&mut self, lattice: &mut Lattice) -> bool {
        let row = self.source.next_index(lattice.rows()) as isize;
        let col = self.source.next_index(lattice.cols()) as isize;
        self.step(lattice, row, col)
    }

    /// Apply `n_steps` random-site steps. Returns the number of accepted flips.
    pub fn run(&mut self, lattice: &mut Lattice, n_steps: usize) -> usize {
        match self.run_observed(lattice, n_steps, |_| Ok::<(), Infallible>(())) {
            Ok(accepted) => accepted,
            Err(never) => match never {},
        }
    }

    /// Like [`run`](Self::run), calling `on_step` after every step.
    ///
    /// An observer error ends the run after the step it was reported for; the
    /// lattice is left in a consistent state.
    pub fn run_observed<E>(
        &mut self,
        lattice: &mut Lattice,
        n_steps: usize,
        mut on_step: impl FnMut(&Observation) -> Result<(), E>,
    ) -> Result<usize, E> {
        let mut accepted = 0;
        for step in 0..n_steps {
            accepted += self.sweep_step(lattice) as usize;
            on_step(&Observation::of(step, lattice))?;
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcmc::{seeded, ScriptedSource};
    use crate::spins::ModelParams;
    use approx::assert_relative_eq;

    fn all_up(rows: usize, cols: usize, params: ModelParams) -> Lattice {
        Lattice::filled(rows, cols, params, 1).unwrap()
    }

    #[test]
    fn test_downhill_accepts_without_draw() {
        let mut lat = all_up(4, 4, ModelParams::new(1.0, 0.0, 1.0));
        lat.flip(1, 1);
        // Flipping (1,1) back lowers the energy by 8.
        let mut engine = Metropolis::new(ScriptedSource::new(&[], &[]));
        assert!(engine.step(&mut lat, 1, 1));
        assert_eq!(engine.source_mut().uniforms_drawn, 0);
        assert_eq!(lat.magnetization(), 16);
    }

    #[test]
    fn test_zero_delta_draws_and_accepts() {
        // J = 0, H = 0 makes every delta exactly zero.
        let mut lat = all_up(3, 3, ModelParams::new(0.0, 0.0, 2.0));
        let mut engine = Metropolis::new(ScriptedSource::new(&[0.999_999], &[]));
        assert_eq!(lat.flip_delta(0, 0), 0.0);
        assert!(engine.step(&mut lat, 0, 0));
        assert_eq!(engine.source_mut().uniforms_drawn, 1);
        assert_eq!(lat.get(0, 0), -1);
    }

    #[test]
    fn test_zero_delta_accepted_at_zero_temperature() {
        let mut lat = all_up(3, 3, ModelParams::new(0.0, 0.0, f64::INFINITY));
        let mut engine = Metropolis::new(ScriptedSource::new(&[0.0], &[]));
        assert_eq!(lat.flip_delta(0, 0), 0.0);
        assert!(engine.step(&mut lat, 0, 0));
        assert_eq!(engine.source_mut().uniforms_drawn, 1);
        assert_eq!(lat.magnetization(), 7);
    }

    #[test]
    fn test_uphill_rejected_at_zero_temperature() {
        let mut lat = all_up(4, 4, ModelParams::new(1.0, 0.0, f64::INFINITY));
        let mut engine = Metropolis::new(ScriptedSource::new(&[0.0], &[]));
        assert!(!engine.step(&mut lat, 1, 2));
        assert_eq!(lat.magnetization(), 16);
    }

    #[test]
    fn test_uphill_threshold() {
        let beta = 0.5;
        let params = ModelParams::new(1.0, 0.0, beta);
        let p = (-beta * 8.0f64).exp();

        let mut lat = all_up(4, 4, params);
        let mut engine = Metropolis::new(ScriptedSource::new(&[p], &[]));
        assert!(!engine.step(&mut lat, 2, 2), "r == p must reject");
        assert_eq!(lat.magnetization(), 16);
        assert_eq!(lat.energy(), -32.0);

        let mut engine = Metropolis::new(ScriptedSource::new(&[p * 0.999], &[]));
        assert!(engine.step(&mut lat, 2, 2));
        assert_eq!(lat.magnetization(), 14);
        assert_eq!(lat.energy(), -24.0);
    }

    #[test]
    fn test_sweep_step_picks_row_then_col() {
        let mut lat = all_up(3, 5, ModelParams::new(0.0, -1.0, 1.0));
        // H < 0 on an all-up lattice: every flip is downhill.
        let mut engine = Metropolis::new(ScriptedSource::new(&[], &[2, 4]));
        assert!(engine.sweep_step(&mut lat));
        assert_eq!(lat.get(2, 4), -1);
        assert_eq!(lat.spins().iter().filter(|&&s| s == -1).count(), 1);
    }

    #[test]
    fn test_run_observed_reports_each_step() {
        let mut rng = seeded(11);
        let mut lat = Lattice::new(8, 8, ModelParams::new(1.0, 0.1, 0.4), &mut rng).unwrap();
        let mut engine = Metropolis::new(rng);
        let mut seen = Vec::new();
        let accepted = engine
            .run_observed(&mut lat, 50, |obs| {
                seen.push(*obs);
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(seen.len(), 50);
        assert!(accepted <= 50);
        assert_eq!(seen.last().unwrap().energy, lat.energy());
        for (i, obs) in seen.iter().enumerate() {
            assert_eq!(obs.step, i);
            assert_eq!(obs.size, 64);
            assert_relative_eq!(obs.temperature(), 2.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_observer_error_stops_run() {
        let mut rng = seeded(12);
        let mut lat = Lattice::new(4, 4, ModelParams::new(1.0, 0.0, 1.0), &mut rng).unwrap();
        let mut engine = Metropolis::new(rng);
        let mut calls = 0;
        let err = engine.run_observed(&mut lat, 100, |obs| {
            calls += 1;
            if obs.step == 9 {
                Err("stop")
            } else {
                Ok(())
            }
        });
        assert_eq!(err, Err("stop"));
        assert_eq!(calls, 10);
        let (e, m) = lat.rescan();
        assert_relative_eq!(lat.energy(), e, epsilon = 1e-9);
        assert_eq!(lat.magnetization(), m);
    }

    #[test]
    fn test_long_run_keeps_aggregates() {
        let mut rng = seeded(13);
        let mut lat = Lattice::new(20, 20, ModelParams::new(1.0, 0.15, 0.44), &mut rng).unwrap();
        let mut engine = Metropolis::new(rng);
        for _ in 0..10 {
            engine.run(&mut lat, 5_000);
            let (e, m) = lat.rescan();
            assert_relative_eq!(lat.energy(), e, epsilon = 1e-9, max_relative = 1e-9);
            assert_eq!(lat.magnetization(), m);
        }
    }

    #[test]
    fn test_deterministic_replay() {
        let params = ModelParams::new(1.0, 0.05, 0.6);
        let trace = |seed: u64| {
            let mut rng = seeded(seed);
            let mut lat = Lattice::new(10, 7, params, &mut rng).unwrap();
            let mut engine = Metropolis::new(rng);
            let mut out = Vec::new();
            engine
                .run_observed(&mut lat, 20_000, |obs| {
                    out.push((obs.energy.to_bits(), obs.magnetization));
                    Ok::<_, ()>(())
                })
                .unwrap();
            out
        };
        assert_eq!(trace(99), trace(99));
        assert_ne!(trace(99), trace(100));
    }

    #[test]
    fn test_cold_lattice_orders() {
        // Far below T_c a ferromagnet started at random should gain |m|.
        let mut rng = seeded(14);
        let mut lat = Lattice::new(16, 16, ModelParams::new(1.0, 0.2, 2.0), &mut rng).unwrap();
        let mut engine = Metropolis::new(rng);
        let start = lat.energy();
        engine.run(&mut lat, 200_000);
        assert!(lat.energy() < start);
        assert!(lat.magnetization() > 0);
    }
}
