//! Coupling traits between the grid and the particle ensembles.
//!
//! The grid implements [`ElectricField`] and consumes [`ChargeSource`];
//! species implement [`ChargeSource`] and consume [`ElectricField`]. Neither
//! crate depends on the other.

/// Read access to the field and clock a particle pusher needs.
///
/// # Examples
///
/// ```
/// use espic_core::ElectricField;
///
/// struct Uniform(f64);
///
/// impl ElectricField for Uniform {
///     fn dt(&self) -> f64 { 0.01 }
///     fn evaluate_field_at(&self, _x: f64) -> f64 { self.0 }
/// }
///
/// let field = Uniform(2.0);
/// assert_eq!(field.evaluate_field_at(0.3), 2.0);
/// ```
pub trait ElectricField {
    /// Time-step size.
    fn dt(&self) -> f64;

    /// Electric field at position `x` in the periodic domain `[0, 1)`.
    fn evaluate_field_at(&self, x: f64) -> f64;
}

/// How a species contributes to the grid charge density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChargeContribution<'a> {
    /// Linear deposition of every particle; particle `i` carries
    /// `charge * weights[i]`.
    Particles {
        /// Species charge.
        charge: f64,
        /// Particle positions in `[0, 1)`.
        positions: &'a [f64],
        /// Statistical weights, one per position.
        weights: &'a [f64],
    },
    /// Constant density added at every primary node.
    Background {
        /// Density added per node.
        density: f64,
    },
}

/// Anything that deposits charge onto the grid.
pub trait ChargeSource {
    /// The contribution of this source for the current step.
    fn charge_contribution(&self) -> ChargeContribution<'_>;
}
