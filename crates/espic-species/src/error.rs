//! Error types for species construction, sampling and the push.

use std::error::Error;
use std::fmt;

/// Errors arising from species construction, initial sampling or the push.
#[derive(Clone, Debug, PartialEq)]
pub enum SpeciesError {
    /// A kinetic species was given zero particles.
    NoParticles,
    /// Per-particle arrays have different lengths.
    LengthMismatch {
        /// Name of the offending array.
        array: &'static str,
        /// Expected length (the number of positions).
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A particle position is outside `[0, 1)` or not finite.
    PositionOutOfRange {
        /// Particle index.
        index: usize,
        /// The rejected position.
        value: f64,
    },
    /// A species or sampler parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A particle became non-finite during the push.
    NonFiniteParticle {
        /// Particle index.
        index: usize,
    },
    /// The rejection sampler hit its attempt limit without accepting a particle.
    SamplingExhausted {
        /// Consecutive rejected trials.
        attempts: u64,
    },
}

impl fmt::Display for SpeciesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParticles => write!(f, "kinetic species needs at least one particle"),
            Self::LengthMismatch {
                array,
                expected,
                actual,
            } => write!(f, "{array} has {actual} entries, expected {expected}"),
            Self::PositionOutOfRange { index, value } => {
                write!(f, "particle {index}: position {value} outside [0, 1)")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid {name}: {value}")
            }
            Self::NonFiniteParticle { index } => {
                write!(f, "particle {index} became non-finite during push")
            }
            Self::SamplingExhausted { attempts } => {
                write!(f, "rejection sampler gave up after {attempts} rejected trials")
            }
        }
    }
}

impl Error for SpeciesError {}

/// Check that `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, SpeciesError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SpeciesError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_nan_and_infinity() {
        assert_eq!(require_positive("mass", 2.0), Ok(2.0));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(require_positive("mass", bad).is_err());
        }
    }

    #[test]
    fn display_names_the_parameter() {
        let e = SpeciesError::InvalidParameter {
            name: "temperature",
            value: -1.0,
        };
        assert_eq!(e.to_string(), "invalid temperature: -1");
    }
}
