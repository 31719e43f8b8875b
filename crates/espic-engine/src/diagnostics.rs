//! Conserved-quantity diagnostics.

use std::fmt;

use espic_mesh::Mesh;

use crate::plasma::Plasma;

/// Global quantities measured after a step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Diagnostics {
    /// Simulation time.
    pub t: f64,
    /// Charge on the distinct grid nodes.
    pub total_charge: f64,
    /// `Σ ½ m vth² Σ w v.x²` over kinetic species.
    pub kinetic_energy: f64,
    /// `½ Σ E² dx` over the staggered field.
    pub field_energy: f64,
}

impl Diagnostics {
    /// Measure the current state of `mesh` and `plasma`.
    pub fn measure(mesh: &Mesh, plasma: &Plasma) -> Self {
        let field_energy = 0.5
            * mesh
                .electric_field_staggered()
                .iter()
                .map(|e| e * e)
                .sum::<f64>()
            * mesh.dx();
        Self {
            t: mesh.t(),
            total_charge: mesh.total_charge(),
            kinetic_energy: plasma.iter().map(|s| s.kinetic_energy()).sum(),
            field_energy,
        }
    }

    /// Kinetic plus field energy.
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.field_energy
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.4} charge={:.6e} ke={:.6e} fe={:.6e} total={:.6e}",
            self.t,
            self.total_charge,
            self.kinetic_energy,
            self.field_energy,
            self.total_energy()
        )
    }
}
