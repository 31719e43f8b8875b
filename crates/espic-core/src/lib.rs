//! Core types and traits for the espic particle-in-cell kernel.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions that let the grid and the particle ensembles meet
//! without depending on each other:
//!
//! - [`ElectricField`]: what a particle pusher reads from the grid.
//! - [`ChargeSource`]: what the grid reads from a species during deposition.
//! - [`InvariantError`]: numerical invariants that failed to hold.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod traits;

pub use error::InvariantError;
pub use traits::{ChargeContribution, ChargeSource, ElectricField};

/// Relative tolerance for the post-deposition charge conservation check.
///
/// Scaled by the total absolute charge injected in the deposit.
pub const CHARGE_TOLERANCE: f64 = 1e-9;

/// Relative tolerance for the Poisson residual check.
///
/// Scaled by the largest magnitude among the potential and the
/// right-hand side of the discrete equation.
pub const SOLVE_TOLERANCE: f64 = 1e-9;
