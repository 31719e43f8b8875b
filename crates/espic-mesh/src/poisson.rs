//! Tridiagonal Poisson solve on the primary grid.

use crate::error::MeshError;
use crate::mesh::Mesh;
use espic_core::{InvariantError, SOLVE_TOLERANCE};

/// Thomas-algorithm solver with preallocated sweep buffers.
///
/// Solves `lower * x[i-1] + diag * x[i] + upper * x[i+1] = rhs[i]` for a
/// constant-coefficient tridiagonal system of fixed size.
#[derive(Clone, Debug)]
pub(crate) struct TridiagonalSolver {
    c_prime: Vec<f64>,
    d_prime: Vec<f64>,
    rhs: Vec<f64>,
}

impl TridiagonalSolver {
    pub(crate) fn new(unknowns: usize) -> Self {
        Self {
            c_prime: vec![0.0; unknowns],
            d_prime: vec![0.0; unknowns],
            rhs: vec![0.0; unknowns],
        }
    }

    pub(crate) fn rhs_mut(&mut self) -> &mut [f64] {
        &mut self.rhs
    }

    /// Forward sweep then back substitution into `out`.
    ///
    /// `out` must have the same length as the system.
    pub(crate) fn solve(&mut self, lower: f64, diag: f64, upper: f64, out: &mut [f64]) {
        let n = self.rhs.len();
        debug_assert_eq!(out.len(), n);
        if n == 0 {
            return;
        }

        self.c_prime[0] = upper / diag;
        self.d_prime[0] = self.rhs[0] / diag;
        for i in 1..n {
            let m = diag - lower * self.c_prime[i - 1];
            self.c_prime[i] = upper / m;
            self.d_prime[i] = (self.rhs[i] - lower * self.d_prime[i - 1]) / m;
        }

        out[n - 1] = self.d_prime[n - 1];
        for i in (0..n - 1).rev() {
            out[i] = self.d_prime[i] - self.c_prime[i] * out[i + 1];
        }
    }
}

impl Mesh {
    /// Solve the discrete Poisson equation for `potential`.
    ///
    /// ```text
    /// potential[i-1] - 2 potential[i] + potential[i+1] = dx² (1 - charge_density[i])
    /// ```
    ///
    /// for the interior nodes `1..nmesh-1`, with
    /// `potential[0] = potential[nmesh-1] = 0`. The constant 1 is the
    /// uniform neutralizing background. Both duplicated boundaries are
    /// rewritten from index 0 afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Invariant`] with [`InvariantError::SolveResidual`]
    /// if the solution does not satisfy the discrete equation to within
    /// [`SOLVE_TOLERANCE`] (scaled by the problem magnitude), which also
    /// catches non-finite densities.
    pub fn solve_for_potential(&mut self) -> Result<(), MeshError> {
        let nintervals = self.nintervals();
        let dx2 = self.dx() * self.dx();
        Mesh::sync_boundary(&mut self.charge_density);

        for (r, &rho) in self
            .solver
            .rhs_mut()
            .iter_mut()
            .zip(&self.charge_density[1..nintervals])
        {
            *r = dx2 * (1.0 - rho);
        }

        self.solver
            .solve(1.0, -2.0, 1.0, &mut self.potential[1..nintervals]);
        self.potential[0] = 0.0;
        Mesh::sync_boundary(&mut self.potential);

        self.check_residual(dx2)
    }

    fn check_residual(&self, dx2: f64) -> Result<(), MeshError> {
        let p = &self.potential;
        let rho = &self.charge_density;

        let mut scale = 0.0_f64;
        let mut worst = (0, 0.0_f64);
        for i in 1..self.nintervals() {
            let rhs = dx2 * (1.0 - rho[i]);
            let residual = (p[i - 1] - 2.0 * p[i] + p[i + 1] - rhs).abs();
            scale = scale.max(p[i].abs()).max(rhs.abs());
            if residual.is_nan() {
                worst = (i, residual);
                break;
            }
            if residual > worst.1 {
                worst = (i, residual);
            }
        }

        let tolerance = SOLVE_TOLERANCE * scale;
        let (node, residual) = worst;
        if !(residual <= tolerance) {
            return Err(InvariantError::SolveResidual {
                node,
                residual,
                tolerance,
            }
            .into());
        }
        Ok(())
    }
}
