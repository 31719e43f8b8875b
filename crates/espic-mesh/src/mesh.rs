//! The periodic 1D grid and its field arrays.

use crate::error::MeshError;
use crate::periodic::get_bracket;
use crate::poisson::TridiagonalSolver;
use espic_core::{ElectricField, InvariantError};

/// A uniform periodic grid on `[0, 1)` with a staggered companion grid.
///
/// The primary grid stores `nmesh = nintervals + 1` samples: index 0 and
/// index `nmesh - 1` are the same physical point (x = 0 ≡ x = 1). The
/// duplicate is rewritten from index 0 after every deposit and solve, so
/// `charge_density` and `potential` always agree at both ends. The
/// staggered grid holds `nintervals` cell centres with no duplicate.
///
/// | Array                      | Length   | Sampled at        |
/// |----------------------------|----------|-------------------|
/// | `mesh`                     | `nmesh`  | `i * dx`          |
/// | `mesh_staggered`           | `nmesh-1`| `(i + 0.5) * dx`  |
/// | `charge_density`           | `nmesh`  | primary points    |
/// | `potential`                | `nmesh`  | primary points    |
/// | `electric_field_staggered` | `nmesh-1`| staggered points  |
///
/// # Examples
///
/// ```
/// use espic_mesh::Mesh;
///
/// let mesh = Mesh::builder().intervals(10).build().unwrap();
/// assert_eq!(mesh.nmesh(), 11);
/// assert_eq!(mesh.dx(), 0.1);
/// assert_eq!(mesh.mesh_staggered().len(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct Mesh {
    nintervals: usize,
    dx: f64,
    mesh: Vec<f64>,
    mesh_staggered: Vec<f64>,
    pub(crate) charge_density: Vec<f64>,
    pub(crate) potential: Vec<f64>,
    electric_field_staggered: Vec<f64>,
    t: f64,
    dt: f64,
    nt: u64,
    pub(crate) solver: TridiagonalSolver,
}

/// Builder for [`Mesh`].
///
/// Defaults: 10 intervals, `dt = 0.01`, 1000 steps.
#[derive(Clone, Debug)]
pub struct MeshBuilder {
    intervals: usize,
    dt: f64,
    steps: u64,
}

impl Mesh {
    /// Default number of periodic intervals.
    pub const DEFAULT_INTERVALS: usize = 10;
    /// Default time-step size.
    pub const DEFAULT_DT: f64 = 0.01;
    /// Default number of time steps.
    pub const DEFAULT_STEPS: u64 = 1000;

    /// Create a new builder for configuring a `Mesh`.
    pub fn builder() -> MeshBuilder {
        MeshBuilder {
            intervals: Self::DEFAULT_INTERVALS,
            dt: Self::DEFAULT_DT,
            steps: Self::DEFAULT_STEPS,
        }
    }

    /// Create a mesh with `nintervals` periodic cells and the given clock.
    ///
    /// All field arrays start at zero and the clock starts at `t = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::TooFewIntervals`] if `nintervals < 2` and
    /// [`MeshError::InvalidTimeStep`] if `dt` is not finite and positive.
    pub fn new(nintervals: usize, dt: f64, nt: u64) -> Result<Self, MeshError> {
        if nintervals < 2 {
            return Err(MeshError::TooFewIntervals {
                intervals: nintervals,
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(MeshError::InvalidTimeStep { value: dt });
        }

        let nmesh = nintervals + 1;
        let dx = 1.0 / nintervals as f64;
        Ok(Self {
            nintervals,
            dx,
            mesh: (0..nmesh).map(|i| i as f64 * dx).collect(),
            mesh_staggered: (0..nintervals).map(|i| (i as f64 + 0.5) * dx).collect(),
            charge_density: vec![0.0; nmesh],
            potential: vec![0.0; nmesh],
            electric_field_staggered: vec![0.0; nintervals],
            t: 0.0,
            dt,
            nt,
            solver: TridiagonalSolver::new(nintervals - 1),
        })
    }

    /// Number of periodic cells.
    pub fn nintervals(&self) -> usize {
        self.nintervals
    }

    /// Number of stored primary samples (`nintervals + 1`).
    pub fn nmesh(&self) -> usize {
        self.nintervals + 1
    }

    /// Primary grid spacing.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Primary grid positions, including the duplicated endpoint.
    pub fn mesh(&self) -> &[f64] {
        &self.mesh
    }

    /// Staggered (cell-centre) positions.
    pub fn mesh_staggered(&self) -> &[f64] {
        &self.mesh_staggered
    }

    /// Charge density at the primary points.
    pub fn charge_density(&self) -> &[f64] {
        &self.charge_density
    }

    /// Mutable charge density, for drivers that prescribe a density directly.
    ///
    /// The duplicated endpoint is not resynchronised until the next solve.
    pub fn charge_density_mut(&mut self) -> &mut [f64] {
        &mut self.charge_density
    }

    /// Electrostatic potential at the primary points.
    pub fn potential(&self) -> &[f64] {
        &self.potential
    }

    /// Mutable potential, for drivers that prescribe a potential directly.
    pub fn potential_mut(&mut self) -> &mut [f64] {
        &mut self.potential
    }

    /// Electric field at the staggered points.
    pub fn electric_field_staggered(&self) -> &[f64] {
        &self.electric_field_staggered
    }

    /// Mutable staggered electric field.
    pub fn electric_field_staggered_mut(&mut self) -> &mut [f64] {
        &mut self.electric_field_staggered
    }

    /// Simulation clock.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Time-step size.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Total number of steps in the run.
    pub fn nt(&self) -> u64 {
        self.nt
    }

    /// Override the total step count (the clock is left alone).
    pub fn set_nt(&mut self, nt: u64) {
        self.nt = nt;
    }

    /// Advance the clock by one step: `t += dt`.
    pub fn advance_clock(&mut self) {
        self.t += self.dt;
    }

    /// Interpolate the staggered electric field at `x`.
    ///
    /// Treats the field as a periodic sequence positioned at
    /// [`mesh_staggered`](Self::mesh_staggered) and interpolates linearly
    /// between the bracketing samples:
    ///
    /// ```text
    /// w_up   = (x - pos[down]) / dx   (periodic distance)
    /// E      = (1 - w_up) * field[down] + w_up * field[up]
    /// ```
    ///
    /// A point exactly on a staggered sample returns that sample.
    pub fn evaluate_field_at(&self, x: f64) -> f64 {
        let (down, up) = get_bracket(x, &self.mesh_staggered, self.dx);

        let mut offset = x - self.mesh_staggered[down];
        if offset < 0.0 {
            // x precedes the first sample; down is the last sample of the previous period.
            offset += 1.0;
        }
        let w_up = offset / self.dx;
        let w_down = 1.0 - w_up;

        w_down * self.electric_field_staggered[down] + w_up * self.electric_field_staggered[up]
    }

    /// Compute the staggered field from the potential by forward difference.
    ///
    /// ```text
    /// E[i] = -(potential[i + 1] - potential[i]) / dx,   i in [0, nmesh - 2]
    /// ```
    pub fn derive_field_from_potential(&mut self) {
        for (i, e) in self.electric_field_staggered.iter_mut().enumerate() {
            *e = -(self.potential[i + 1] - self.potential[i]) / self.dx;
        }
    }

    /// Check that both duplicated boundary samples agree with index 0.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::BoundaryMismatch`] naming the offending array.
    pub fn check_boundaries(&self) -> Result<(), InvariantError> {
        let last = self.nintervals;
        for (array, values) in [
            ("charge_density", &self.charge_density),
            ("potential", &self.potential),
        ] {
            // NaN compares unequal to itself, which is the intended failure.
            if values[0] != values[last] {
                return Err(InvariantError::BoundaryMismatch {
                    array,
                    first: values[0],
                    last: values[last],
                });
            }
        }
        Ok(())
    }

    /// Copy index 0 onto the duplicated endpoint of `array`.
    pub(crate) fn sync_boundary(array: &mut [f64]) {
        let last = array.len() - 1;
        array[last] = array[0];
    }
}

impl ElectricField for Mesh {
    fn dt(&self) -> f64 {
        self.dt
    }

    fn evaluate_field_at(&self, x: f64) -> f64 {
        Mesh::evaluate_field_at(self, x)
    }
}

impl MeshBuilder {
    /// Set the number of periodic intervals (default: 10).
    pub fn intervals(mut self, intervals: usize) -> Self {
        self.intervals = intervals;
        self
    }

    /// Set the time-step size (default: 0.01).
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the total number of steps (default: 1000).
    pub fn steps(mut self, steps: u64) -> Self {
        self.steps = steps;
        self
    }

    /// Build the mesh, validating the configuration.
    ///
    /// # Errors
    ///
    /// See [`Mesh::new`].
    pub fn build(self) -> Result<Mesh, MeshError> {
        Mesh::new(self.intervals, self.dt, self.steps)
    }
}
