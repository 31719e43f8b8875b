//! Reusable grid fixtures.
//!
//! - [`reference_mesh`]: the 10-interval grid (`dt = 0.01`, 1000 steps).
//! - [`ramp_field_mesh`]: the reference grid with `E[i] = i` on the
//!   staggered points.
//! - [`potential_mesh`]: the reference grid with a prescribed potential.

use espic_mesh::Mesh;

/// The 10-interval reference grid with all arrays zeroed.
pub fn reference_mesh() -> Mesh {
    match Mesh::builder().build() {
        Ok(mesh) => mesh,
        Err(e) => panic!("reference mesh must build: {e}"),
    }
}

/// A grid of `intervals` cells with the default clock.
pub fn mesh_with_intervals(intervals: usize) -> Mesh {
    match Mesh::builder().intervals(intervals).build() {
        Ok(mesh) => mesh,
        Err(e) => panic!("mesh with {intervals} intervals must build: {e}"),
    }
}

/// Reference grid whose staggered field is `E[i] = i`.
pub fn ramp_field_mesh() -> Mesh {
    let mut mesh = reference_mesh();
    for (i, e) in mesh.electric_field_staggered_mut().iter_mut().enumerate() {
        *e = i as f64;
    }
    mesh
}

/// Reference grid with `potential[i] = f(i)`.
pub fn potential_mesh(f: impl Fn(usize) -> f64) -> Mesh {
    let mut mesh = reference_mesh();
    for (i, p) in mesh.potential_mut().iter_mut().enumerate() {
        *p = f(i);
    }
    mesh
}
