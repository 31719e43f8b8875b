//! Invariant errors shared by the grid and the stepping loop.
//!
//! These are programming-error signals, not recoverable conditions: the
//! grid raises them immediately after the operation that broke the
//! invariant, and callers surface them rather than retry.

use std::error::Error;
use std::fmt;

/// A numerical invariant of the particle–grid cycle that failed to hold.
#[derive(Clone, Debug, PartialEq)]
pub enum InvariantError {
    /// Charge on the distinct grid nodes after deposition differs from the
    /// charge carried by the sources.
    ChargeNotConserved {
        /// Sum of the charge density over the non-duplicated nodes.
        deposited: f64,
        /// Sum of the charge carried by every source.
        injected: f64,
    },
    /// The duplicated boundary sample disagrees with index 0.
    BoundaryMismatch {
        /// Name of the grid array.
        array: &'static str,
        /// Value at index 0.
        first: f64,
        /// Value at the last index.
        last: f64,
    },
    /// The discrete Poisson equation is not satisfied after the solve.
    SolveResidual {
        /// Interior node with the largest residual.
        node: usize,
        /// Absolute residual at that node.
        residual: f64,
        /// Tolerance the residual was checked against.
        tolerance: f64,
    },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChargeNotConserved {
                deposited,
                injected,
            } => write!(
                f,
                "charge not conserved: deposited {deposited}, injected {injected}"
            ),
            Self::BoundaryMismatch { array, first, last } => write!(
                f,
                "{array}: duplicated boundary out of sync (first {first}, last {last})"
            ),
            Self::SolveResidual {
                node,
                residual,
                tolerance,
            } => write!(
                f,
                "poisson residual {residual} at node {node} exceeds tolerance {tolerance}"
            ),
        }
    }
}

impl Error for InvariantError {}
