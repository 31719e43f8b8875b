//! The periodic 1D grid of the espic particle-in-cell kernel.
//!
//! A [`Mesh`] covers the unit interval `[0, 1)` with `nintervals` cells.
//! It stores charge density and potential on the primary points (with a
//! duplicated endpoint) and the electric field on the staggered cell
//! centres. One step of the particle–grid cycle uses it in this order:
//!
//! 1. [`Mesh::deposit`]: linear charge deposition from every
//!    [`ChargeSource`](espic_core::ChargeSource).
//! 2. [`Mesh::solve_for_potential`]: tridiagonal Poisson solve.
//! 3. [`Mesh::derive_field_from_potential`]: forward-difference field.
//! 4. [`Mesh::evaluate_field_at`]: interpolation for the particle push,
//!    also available through [`ElectricField`](espic_core::ElectricField).
//!
//! Deposition and the solve check their invariants before returning and
//! report a violation as [`MeshError::Invariant`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod deposit;
pub mod error;
pub mod mesh;
pub mod periodic;
mod poisson;

pub use error::MeshError;
pub use mesh::{Mesh, MeshBuilder};
pub use periodic::{get_bracket, primary_interval};
