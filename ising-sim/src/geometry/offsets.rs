/// Orthogonal neighbor offsets `(d_row, d_col)` of the square lattice:
/// right, left, down, up.
pub const ORTHOGONAL: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Orthogonal neighbor coordinates of `(row, col)`, before wrapping.
#[inline]
pub fn orthogonal(row: isize, col: isize) -> impl Iterator<Item = (isize, isize)> {
    ORTHOGONAL
        .iter()
        .map(move |&(dr, dc)| (row.wrapping_add(dr), col.wrapping_add(dc)))
}
