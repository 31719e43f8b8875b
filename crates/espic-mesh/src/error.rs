//! Error types for mesh construction and grid operations.

use espic_core::InvariantError;
use std::error::Error;
use std::fmt;

/// Errors arising from mesh construction, deposition or the Poisson solve.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshError {
    /// Fewer than two periodic intervals: the Poisson system would have
    /// no interior unknowns.
    TooFewIntervals {
        /// The requested interval count.
        intervals: usize,
    },
    /// The time step is zero, negative, NaN or infinite.
    InvalidTimeStep {
        /// The rejected value.
        value: f64,
    },
    /// A particle source supplied different numbers of positions and weights.
    SourceLengthMismatch {
        /// Number of positions.
        positions: usize,
        /// Number of weights.
        weights: usize,
    },
    /// A grid invariant failed after deposition or the solve.
    Invariant(InvariantError),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewIntervals { intervals } => {
                write!(f, "mesh needs at least 2 intervals, got {intervals}")
            }
            Self::InvalidTimeStep { value } => {
                write!(f, "time step must be finite and > 0, got {value}")
            }
            Self::SourceLengthMismatch { positions, weights } => write!(
                f,
                "charge source has {positions} positions but {weights} weights"
            ),
            Self::Invariant(e) => write!(f, "invariant violated: {e}"),
        }
    }
}

impl Error for MeshError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invariant(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvariantError> for MeshError {
    fn from(e: InvariantError) -> Self {
        Self::Invariant(e)
    }
}
