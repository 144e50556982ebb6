use crate::geometry::{orthogonal, wrap};
use crate::spins::ModelParams;

/// Full-rescan aggregates of a row-major `rows x cols` spin grid.
///
/// Returns `(energy, magnetization)` where the energy counts every bond once:
/// `E = sum_i ( -H*s_i - (J/2)*s_i*n_i )`, with `n_i` the periodic sum of the
/// four orthogonal neighbors of site `i`.
pub fn compute_aggregates(
    spins: &[i8],
    rows: usize,
    cols: usize,
    params: &ModelParams,
) -> (f64, i64) {
    debug_assert_eq!(spins.len(), rows * cols);
    let (r_len, c_len) = (rows as isize, cols as isize);

    let mut field = 0i64;
    let mut bonds = 0i64;
    for r in 0..rows {
        for c in 0..cols {
            let si = spins[r * cols + c] as i64;
            let n: i64 = orthogonal(r as isize, c as isize)
                .map(|(nr, nc)| spins[wrap(r_len, nr) * cols + wrap(c_len, nc)] as i64)
                .sum();
            field += si;
            bonds += si * n;
        }
    }

    let energy = -params.h * field as f64 - 0.5 * params.j * bonds as f64;
    (energy, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_up_square() {
        // 4x4 torus has 32 bonds, each contributing -J.
        let spins = vec![1i8; 16];
        let params = ModelParams::new(1.0, 0.0, 1.0);
        let (e, m) = compute_aggregates(&spins, 4, 4, &params);
        assert_eq!(e, -32.0);
        assert_eq!(m, 16);
    }

    #[test]
    fn test_field_only() {
        let spins = vec![1, -1, -1, -1, 1, 1];
        let params = ModelParams::new(0.0, 0.5, 1.0);
        let (e, m) = compute_aggregates(&spins, 2, 3, &params);
        assert_eq!(m, 0);
        assert_eq!(e, 0.0);

        let params = ModelParams::new(0.0, 2.0, 1.0);
        let spins = vec![-1i8; 6];
        let (e, m) = compute_aggregates(&spins, 3, 2, &params);
        assert_eq!(m, -6);
        assert_eq!(e, 12.0);
    }

    #[test]
    fn test_checkerboard_antiferro() {
        // Every bond is unsatisfied for ferromagnetic J.
        let spins: Vec<i8> = (0..16)
            .map(|i| if (i / 4 + i % 4) % 2 == 0 { 1 } else { -1 })
            .collect();
        let params = ModelParams::new(1.0, 0.0, 1.0);
        let (e, m) = compute_aggregates(&spins, 4, 4, &params);
        assert_eq!(e, 32.0);
        assert_eq!(m, 0);
    }
}
