//! Per-particle storage for a kinetic species.

use crate::error::SpeciesError;
use crate::sampling::Initializer;

/// Three-component particle velocities, stored component-wise.
///
/// Only `x` is driven by the 1D field; `y` and `z` are carried unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Velocity along the simulated axis.
    pub x: Vec<f64>,
    /// First transverse component.
    pub y: Vec<f64>,
    /// Second transverse component.
    pub z: Vec<f64>,
}

impl Velocity {
    /// Velocities with only the `x` component set.
    pub fn longitudinal(x: Vec<f64>) -> Self {
        let n = x.len();
        Self {
            x,
            y: vec![0.0; n],
            z: vec![0.0; n],
        }
    }

    /// Velocities of `n` particles at rest.
    pub fn zeros(n: usize) -> Self {
        Self::longitudinal(vec![0.0; n])
    }
}

/// A fixed-size ensemble of equally weighted super-particles.
///
/// Every particle gets weight `1/n`, so a species of charge `q` deposits a
/// total charge of `q` regardless of its particle count.
#[derive(Clone, Debug, PartialEq)]
pub struct Particles {
    x: Vec<f64>,
    v: Velocity,
    w: Vec<f64>,
}

impl Particles {
    /// Build an ensemble from explicit positions and velocities.
    ///
    /// # Errors
    ///
    /// - [`SpeciesError::NoParticles`] if `x` is empty.
    /// - [`SpeciesError::LengthMismatch`] if a velocity component has a
    ///   different length from `x`.
    /// - [`SpeciesError::PositionOutOfRange`] if a position is outside
    ///   `[0, 1)` or not finite.
    pub fn new(x: Vec<f64>, v: Velocity) -> Result<Self, SpeciesError> {
        let n = x.len();
        if n == 0 {
            return Err(SpeciesError::NoParticles);
        }
        for (array, len) in [("v.x", v.x.len()), ("v.y", v.y.len()), ("v.z", v.z.len())] {
            if len != n {
                return Err(SpeciesError::LengthMismatch {
                    array,
                    expected: n,
                    actual: len,
                });
            }
        }
        if let Some((index, &value)) = x
            .iter()
            .enumerate()
            .find(|(_, x)| !(0.0..1.0).contains(*x))
        {
            return Err(SpeciesError::PositionOutOfRange { index, value });
        }

        Ok(Self {
            x,
            v,
            w: vec![1.0 / n as f64; n],
        })
    }

    /// Draw `n` particles from an [`Initializer`].
    ///
    /// # Errors
    ///
    /// Propagates initializer failures and the checks of [`Particles::new`].
    pub fn sample<I: Initializer + ?Sized>(n: usize, init: &mut I) -> Result<Self, SpeciesError> {
        if n == 0 {
            return Err(SpeciesError::NoParticles);
        }
        let (x, v) = init.initialize(n)?;
        Self::new(x, v)
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether `len() == 0`.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Particle positions in `[0, 1)`.
    pub fn positions(&self) -> &[f64] {
        &self.x
    }

    /// Particle velocities.
    pub fn velocities(&self) -> &Velocity {
        &self.v
    }

    /// Statistical weights (`1/n` each).
    pub fn weights(&self) -> &[f64] {
        &self.w
    }

    /// Positions and `x` velocities, mutably, for the pusher.
    pub(crate) fn phase_space_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.x, &mut self.v.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_uniform() {
        let p = Particles::new(vec![0.1, 0.2, 0.3, 0.4], Velocity::zeros(4)).unwrap();
        assert_eq!(p.len(), 4);
        assert!(p.weights().iter().all(|&w| w == 0.25));
    }

    #[test]
    fn is_empty_mirrors_len() {
        let p = Particles::new(vec![0.5], Velocity::zeros(1)).unwrap();
        assert_eq!(p.is_empty(), p.len() == 0);
        assert!(!p.is_empty());
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        assert_eq!(
            Particles::new(vec![], Velocity::zeros(0)),
            Err(SpeciesError::NoParticles)
        );
    }

    #[test]
    fn velocity_length_must_match() {
        let v = Velocity {
            x: vec![0.0; 2],
            y: vec![0.0; 3],
            z: vec![0.0; 2],
        };
        assert_eq!(
            Particles::new(vec![0.1, 0.2], v),
            Err(SpeciesError::LengthMismatch {
                array: "v.y",
                expected: 2,
                actual: 3,
            })
        );
    }

    #[test]
    fn positions_outside_unit_interval_are_rejected() {
        for bad in [1.0, -0.1, f64::NAN] {
            let result = Particles::new(vec![0.5, bad], Velocity::zeros(2));
            assert!(
                matches!(result, Err(SpeciesError::PositionOutOfRange { index: 1, .. })),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn longitudinal_velocity_zeroes_transverse_components() {
        let v = Velocity::longitudinal(vec![1.0, -2.0]);
        assert_eq!(v.y, vec![0.0, 0.0]);
        assert_eq!(v.z, vec![0.0, 0.0]);
    }
}
