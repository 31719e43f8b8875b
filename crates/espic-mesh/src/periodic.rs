//! Periodic indexing on the unit interval.
//!
//! Both lookups take the sample positions as a slice instead of recomputing
//! them, so a bracket is always checked against the exact stored values.

/// Find the periodic bracket of `x` among evenly spaced samples.
///
/// `samples` holds `L` ordered positions spaced `dx` apart starting at
/// `dx / 2` (the staggered grid). Returns `(down, up)` with
/// `samples[down] <= x < samples[up]` under periodic ordering:
///
/// ```text
/// up   = floor(x/dx - 0.5) + 1  (mod L)
/// down = up - 1                 (mod L)
/// ```
///
/// When `x` lies before the first sample or at/after the last one the
/// bracket wraps to `(L - 1, 0)`. A one-sample slip from rounding in
/// `x / dx` is corrected against the stored positions, so a point that
/// sits exactly on a sample always gets that sample as `down`.
///
/// `samples` must not be empty.
///
/// # Examples
///
/// ```
/// use espic_mesh::get_bracket;
///
/// let dx = 0.25;
/// let samples = [0.125, 0.375, 0.625, 0.875];
/// assert_eq!(get_bracket(0.5, &samples, dx), (1, 2));
/// assert_eq!(get_bracket(0.375, &samples, dx), (1, 2));
/// // Wraparound on either side.
/// assert_eq!(get_bracket(0.0, &samples, dx), (3, 0));
/// assert_eq!(get_bracket(0.9, &samples, dx), (3, 0));
/// ```
pub fn get_bracket(x: f64, samples: &[f64], dx: f64) -> (usize, usize) {
    debug_assert!(!samples.is_empty(), "bracket search needs samples");
    let len = samples.len() as i64;

    // k = -1 means "before the first sample", k = len - 1 "at/after the last".
    let mut k = ((x / dx - 0.5).floor() as i64).clamp(-1, len - 1);
    if k + 1 < len && x >= samples[(k + 1) as usize] {
        k += 1;
    } else if k >= 0 && x < samples[k as usize] {
        k -= 1;
    }

    let down = k.rem_euclid(len) as usize;
    let up = (k + 1).rem_euclid(len) as usize;
    (down, up)
}

/// Index `i` of the primary interval `[mesh[i], mesh[i + 1])` holding `x`.
///
/// `mesh` holds the `nintervals + 1` primary points including the
/// duplicated endpoint, so the last interval `[mesh[nintervals - 1], 1)`
/// is the wraparound interval. Every `x` in `[0, 1)` maps to exactly one
/// interval; values outside are clamped to the first or last one.
pub fn primary_interval(x: f64, mesh: &[f64], dx: f64) -> usize {
    debug_assert!(mesh.len() >= 2, "primary mesh needs at least one interval");
    let last = mesh.len() as i64 - 2;

    let mut i = ((x / dx).floor() as i64).clamp(0, last);
    if i < last && x >= mesh[(i + 1) as usize] {
        i += 1;
    } else if i > 0 && x < mesh[i as usize] {
        i -= 1;
    }
    i as usize
}
