//! The stepping protocol: push, deposit, solve, derive field.
//!
//! [`step`] advances a mesh and a plasma by one time step. It takes both
//! explicitly and keeps no state of its own, so drivers other than
//! [`Simulation`](crate::Simulation) can call it directly.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use espic_core::InvariantError;
use espic_mesh::{Mesh, MeshError};
use espic_species::SpeciesError;

use crate::metrics::StepMetrics;
use crate::plasma::Plasma;

// ── StepError ──────────────────────────────────────────────────────

/// A phase of the stepping protocol failed.
///
/// The mesh and plasma are left as the failing phase found them; the
/// clock is not advanced.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A species push produced a non-finite particle.
    Push {
        /// Species name.
        species: String,
        /// The underlying failure.
        source: SpeciesError,
    },
    /// Charge deposition failed.
    Deposit(MeshError),
    /// The Poisson solve failed.
    Solve(MeshError),
    /// A grid invariant did not hold at the end of the step.
    Invariant(InvariantError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push { species, source } => write!(f, "push of '{species}': {source}"),
            Self::Deposit(e) => write!(f, "deposit: {e}"),
            Self::Solve(e) => write!(f, "solve: {e}"),
            Self::Invariant(e) => write!(f, "end of step: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Push { source, .. } => Some(source),
            Self::Deposit(e) | Self::Solve(e) => Some(e),
            Self::Invariant(e) => Some(e),
        }
    }
}

// ── Protocol ───────────────────────────────────────────────────────

/// Advance `mesh` and `plasma` by one step.
///
/// 1. Push every kinetic species through the current field.
/// 2. Deposit every species into the charge density.
/// 3. Solve for the potential.
/// 4. Derive the staggered field.
/// 5. Advance the clock by `dt`.
///
/// # Errors
///
/// Returns the first failing phase as a [`StepError`]; later phases are
/// skipped.
pub fn step(mesh: &mut Mesh, plasma: &mut Plasma) -> Result<StepMetrics, StepError> {
    let step_start = Instant::now();
    let mut metrics = StepMetrics::default();

    let push_start = Instant::now();
    for species in plasma.iter_mut() {
        species.push(&*mesh).map_err(|source| StepError::Push {
            species: species.name().to_string(),
            source,
        })?;
        metrics.particles_pushed += species.len();
    }
    metrics.push_us = push_start.elapsed().as_micros() as u64;

    let deposit_start = Instant::now();
    mesh.deposit(plasma.iter()).map_err(StepError::Deposit)?;
    metrics.deposit_us = deposit_start.elapsed().as_micros() as u64;

    let solve_start = Instant::now();
    mesh.solve_for_potential().map_err(StepError::Solve)?;
    metrics.solve_us = solve_start.elapsed().as_micros() as u64;

    let field_start = Instant::now();
    mesh.derive_field_from_potential();
    metrics.field_us = field_start.elapsed().as_micros() as u64;

    mesh.check_boundaries().map_err(StepError::Invariant)?;
    mesh.advance_clock();

    metrics.total_us = step_start.elapsed().as_micros() as u64;
    log::trace!(
        "t={:.4} push={}us deposit={}us solve={}us field={}us",
        mesh.t(),
        metrics.push_us,
        metrics.deposit_us,
        metrics.solve_us,
        metrics.field_us
    );
    Ok(metrics)
}

/// Number of steps already taken, judged from the mesh clock.
pub fn steps_taken(mesh: &Mesh) -> u64 {
    (mesh.t() / mesh.dt()).round() as u64
}

/// Run the remaining steps until the mesh clock reaches `nt * dt`.
///
/// Returns the metrics summed over the steps run.
///
/// # Errors
///
/// Stops at the first failing step and returns its [`StepError`].
pub fn evolve(mesh: &mut Mesh, plasma: &mut Plasma) -> Result<StepMetrics, StepError> {
    let remaining = mesh.nt().saturating_sub(steps_taken(mesh));
    let mut total = StepMetrics::default();
    for _ in 0..remaining {
        total.accumulate(&step(mesh, plasma)?);
    }
    Ok(total)
}
