/// Wrap a signed index onto an axis of length `n` (periodic boundary).
///
/// Equivalent to a floored modulo: the result `w` satisfies `0 <= w < n` and
/// `w ≡ i (mod n)`. Panics if `n <= 0`, which is a caller bug rather than a
/// runtime input.
#[inline]
pub fn wrap(n: isize, i: isize) -> usize {
    assert!(n > 0, "axis length must be positive, got {n}");
    let w = i.rem_euclid(n);
    debug_assert!((0..n).contains(&w));
    w as usize
}
