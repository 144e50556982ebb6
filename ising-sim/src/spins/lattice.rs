use tracing::debug;

use super::energy::compute_aggregates;
use super::ModelParams;
use crate::error::LatticeError;
use crate::geometry::{orthogonal, wrap};
use crate::mcmc::UniformSource;

/// Periodic square lattice of ±1 spins with cached energy and magnetization.
///
/// Sites are stored in row-major order: `(row, col)` lives at
/// `row * cols + col`. Every accessor takes signed coordinates and wraps them
/// onto the torus, so `get(-1, 0)` is the last row of column 0.
///
/// `energy` and `magnetization` are running totals. They are set by a full
/// scan at construction and afterwards only moved by the exact delta of each
/// committed flip.
#[derive(Debug, Clone)]
pub struct Lattice {
    rows: usize,
    cols: usize,
    spins: Vec<i8>,
    params: ModelParams,
    energy: f64,
    magnetization: i64,
    /// Neighbor lookups of a site that land on the site itself (2 per axis of
    /// length 1). Those bonds are `s*s = 1` regardless of the spin.
    self_links: i32,
}

impl Lattice {
    /// Create a lattice with independently randomized spins.
    ///
    /// Draws one uniform per site in row-major order: `-1` if `u < 0.5`,
    /// `+1` otherwise.
    pub fn new<S: UniformSource + ?Sized>(
        rows: usize,
        cols: usize,
        params: ModelParams,
        source: &mut S,
    ) -> Result<Self, LatticeError> {
        let size = checked_size(rows, cols)?;
        let spins = (0..size)
            .map(|_| if source.next_uniform() < 0.5 { -1 } else { 1 })
            .collect();
        let lattice = Self::from_spins(rows, cols, spins, params);
        debug!(
            rows,
            cols,
            energy = lattice.energy,
            magnetization = lattice.magnetization,
            "randomized lattice"
        );
        Ok(lattice)
    }

    /// Create a lattice with every spin set to `spin`.
    pub fn filled(
        rows: usize,
        cols: usize,
        params: ModelParams,
        spin: i8,
    ) -> Result<Self, LatticeError> {
        let size = checked_size(rows, cols)?;
        check_spin(spin)?;
        Ok(Self::from_spins(rows, cols, vec![spin; size], params))
    }

    fn from_spins(rows: usize, cols: usize, spins: Vec<i8>, params: ModelParams) -> Self {
        let self_links = 2 * (rows == 1) as i32 + 2 * (cols == 1) as i32;
        let mut lattice = Self {
            rows,
            cols,
            spins,
            params,
            energy: 0.0,
            magnetization: 0,
            self_links,
        };
        lattice.recompute_aggregates();
        lattice
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn size(&self) -> usize {
        self.spins.len()
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Raw spins in row-major order.
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// Cached total energy. O(1).
    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Cached sum of all spins. O(1).
    #[inline]
    pub fn magnetization(&self) -> i64 {
        self.magnetization
    }

    #[inline]
    fn index(&self, row: isize, col: isize) -> usize {
        wrap(self.rows as isize, row) * self.cols + wrap(self.cols as isize, col)
    }

    #[inline]
    pub fn get(&self, row: isize, col: isize) -> i8 {
        self.spins[self.index(row, col)]
    }

    /// Assign `spin` to a site, keeping the cached aggregates exact.
    ///
    /// Assigning the current value is a no-op. Values other than ±1 are
    /// rejected and leave the lattice untouched.
    pub fn set(&mut self, row: isize, col: isize, spin: i8) -> Result<(), LatticeError> {
        check_spin(spin)?;
        if self.get(row, col) != spin {
            self.flip(row, col);
        }
        Ok(())
    }

    /// Reverse the spin at a site and move the aggregates by the flip delta.
    pub fn flip(&mut self, row: isize, col: isize) {
        let delta = self.flip_delta(row, col);
        let idx = self.index(row, col);
        let new = -self.spins[idx];
        self.spins[idx] = new;
        self.energy += delta;
        self.magnetization += 2 * new as i64;
    }

    /// Sum of the four orthogonal neighbors under periodic wrap, in `-4..=4`.
    ///
    /// On an axis of length 2 both lookups along that axis hit the same
    /// cell; on an axis of length 1 they hit the site itself. Each lookup is
    /// counted, so an all-up lattice always yields 4.
    pub fn neighbor_sum(&self, row: isize, col: isize) -> i32 {
        let r = wrap(self.rows as isize, row) as isize;
        let c = wrap(self.cols as isize, col) as isize;
        orthogonal(r, c).map(|(nr, nc)| self.get(nr, nc) as i32).sum()
    }

    /// Local energy `-H*s - J*s*n` of the spin currently at the site.
    pub fn site_energy(&self, row: isize, col: isize) -> f64 {
        let s = self.get(row, col) as f64;
        let n = self.neighbor_sum(row, col) as f64;
        -self.params.h * s - self.params.j * s * n
    }

    /// Energy change that flipping the site would cause. Does not mutate.
    ///
    /// Closed form of `e_finish - e_start` from a single neighbor sum:
    /// `2*s*(H + J*n)`, where self-links are left out of `n` because they do
    /// not change under a flip.
    #[inline]
    pub fn flip_delta(&self, row: isize, col: isize) -> f64 {
        let s = self.get(row, col) as i32;
        let n = self.neighbor_sum(row, col) - self.self_links * s;
        2.0 * s as f64 * (self.params.h + self.params.j * n as f64)
    }

    /// Scan the whole lattice and return `(energy, magnetization)` without
    /// touching the cached values.
    pub fn rescan(&self) -> (f64, i64) {
        compute_aggregates(&self.spins, self.rows, self.cols, &self.params)
    }

    /// Reset the cached aggregates from a full scan.
    pub fn recompute_aggregates(&mut self) {
        let (energy, magnetization) = self.rescan();
        self.energy = energy;
        self.magnetization = magnetization;
    }
}

fn checked_size(rows: usize, cols: usize) -> Result<usize, LatticeError> {
    let invalid = LatticeError::InvalidDimension { rows, cols };
    if rows == 0 || cols == 0 || rows > isize::MAX as usize || cols > isize::MAX as usize {
        return Err(invalid);
    }
    rows.checked_mul(cols).ok_or(invalid)
}

#[inline]
fn check_spin(spin: i8) -> Result<(), LatticeError> {
    match spin {
        1 | -1 => Ok(()),
        _ => Err(LatticeError::InvalidSpinValue(spin)),
    }
}
