//! Species: normalized physical constants plus a kinetic or adiabatic model.

use crate::error::{require_positive, SpeciesError};
use crate::particles::Particles;
use crate::sampling::RejectionSampler;
use espic_core::{ChargeContribution, ChargeSource, ElectricField};

/// How a species is represented.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    /// Tracked super-particles, pushed every step.
    Kinetic(Particles),
    /// No particles; a constant background density equal to the charge.
    Adiabatic,
}

/// A plasma species.
///
/// Charge, mass and temperature are normalized to a reference species.
/// The thermal velocity `vth = sqrt(2 T / m)` is fixed at construction;
/// particle velocities are stored in units of `vth`.
#[derive(Clone, Debug, PartialEq)]
pub struct Species {
    name: String,
    charge: f64,
    mass: f64,
    temperature: f64,
    vth: f64,
    model: Model,
}

/// Where a kinetic species gets its particles.
#[derive(Clone, Debug)]
enum Population {
    Sampled {
        particles: usize,
        sampler: Option<RejectionSampler>,
    },
    Given(Particles),
    Adiabatic,
}

/// Builder for [`Species`].
///
/// Defaults: charge 1, mass 1, temperature 1, kinetic with 10 particles
/// drawn from the default [`RejectionSampler`].
#[derive(Clone, Debug)]
pub struct SpeciesBuilder {
    name: String,
    charge: f64,
    mass: f64,
    temperature: f64,
    population: Population,
}

impl Species {
    /// Default number of particles of a sampled kinetic species.
    pub const DEFAULT_PARTICLES: usize = 10;

    /// Create a new builder for a species called `name`.
    pub fn builder(name: impl Into<String>) -> SpeciesBuilder {
        SpeciesBuilder {
            name: name.into(),
            charge: 1.0,
            mass: 1.0,
            temperature: 1.0,
            population: Population::Sampled {
                particles: Self::DEFAULT_PARTICLES,
                sampler: None,
            },
        }
    }

    /// Species name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized charge `q`.
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Normalized mass `m`.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Normalized temperature `T`.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Thermal velocity `sqrt(2 T / m)`.
    pub fn vth(&self) -> f64 {
        self.vth
    }

    /// The kinetic or adiabatic representation.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Whether the species is tracked with particles.
    pub fn is_kinetic(&self) -> bool {
        matches!(self.model, Model::Kinetic(_))
    }

    /// The particle ensemble, if kinetic.
    pub fn particles(&self) -> Option<&Particles> {
        match &self.model {
            Model::Kinetic(p) => Some(p),
            Model::Adiabatic => None,
        }
    }

    /// Number of particles (0 for an adiabatic species).
    pub fn len(&self) -> usize {
        self.particles().map_or(0, Particles::len)
    }

    /// Whether the species has no particles (true only when adiabatic).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance every particle by one leapfrog step in `field`.
    ///
    /// For each particle in order:
    ///
    /// ```text
    /// v.x += 0.5 dt E(x) q / (m vth)     half kick
    /// x   += dt v.x vth                  drift
    /// x    = x mod 1                     periodic wrap into [0, 1)
    /// v.x += 0.5 dt E(x) q / (m vth)     half kick at the new position
    /// ```
    ///
    /// `v.y` and `v.z` are not touched. Adiabatic species are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesError::NonFiniteParticle`] if a position or
    /// velocity becomes NaN or infinite; particles before it have already
    /// been advanced.
    pub fn push<F: ElectricField + ?Sized>(&mut self, field: &F) -> Result<(), SpeciesError> {
        let (q, m, vth) = (self.charge, self.mass, self.vth);
        let Model::Kinetic(particles) = &mut self.model else {
            return Ok(());
        };
        let dt = field.dt();
        let (xs, vxs) = particles.phase_space_mut();

        for (index, (x, vx)) in xs.iter_mut().zip(vxs.iter_mut()).enumerate() {
            *vx += 0.5 * dt * field.evaluate_field_at(*x) * q / (m * vth);
            *x += dt * *vx * vth;
            if !x.is_finite() {
                return Err(SpeciesError::NonFiniteParticle { index });
            }

            *x = wrap_unit(*x);

            *vx += 0.5 * dt * field.evaluate_field_at(*x) * q / (m * vth);
            if !vx.is_finite() {
                return Err(SpeciesError::NonFiniteParticle { index });
            }
        }
        Ok(())
    }

    /// Kinetic energy `½ m vth² Σ w v.x²` (0 for an adiabatic species).
    pub fn kinetic_energy(&self) -> f64 {
        let Some(p) = self.particles() else {
            return 0.0;
        };
        let sum: f64 = p
            .weights()
            .iter()
            .zip(&p.velocities().x)
            .map(|(w, v)| w * v * v)
            .sum();
        0.5 * self.mass * self.vth * self.vth * sum
    }
}

/// Fold a finite position into `[0, 1)`.
///
/// Adds whole periods to negative values, then takes the remainder, so a
/// value just below zero lands at `x + 1` (or at 0 if that rounds to 1).
fn wrap_unit(x: f64) -> f64 {
    let x = if x < 0.0 { x.rem_euclid(1.0) } else { x };
    x % 1.0
}

impl ChargeSource for Species {
    fn charge_contribution(&self) -> ChargeContribution<'_> {
        match &self.model {
            Model::Kinetic(p) => ChargeContribution::Particles {
                charge: self.charge,
                positions: p.positions(),
                weights: p.weights(),
            },
            Model::Adiabatic => ChargeContribution::Background {
                density: self.charge,
            },
        }
    }
}

impl SpeciesBuilder {
    /// Set the normalized charge (default: 1). Must be finite.
    pub fn charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    /// Set the normalized mass (default: 1). Must be > 0.
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set the normalized temperature (default: 1). Must be > 0.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sample `n` particles (default: 10). Must be > 0.
    pub fn particles(mut self, n: usize) -> Self {
        let sampler = match self.population {
            Population::Sampled { sampler, .. } => sampler,
            _ => None,
        };
        self.population = Population::Sampled {
            particles: n,
            sampler,
        };
        self
    }

    /// Sample particles with `sampler` instead of the default one.
    pub fn sampler(mut self, sampler: RejectionSampler) -> Self {
        let particles = match self.population {
            Population::Sampled { particles, .. } => particles,
            _ => Species::DEFAULT_PARTICLES,
        };
        self.population = Population::Sampled {
            particles,
            sampler: Some(sampler),
        };
        self
    }

    /// Use an explicit particle ensemble.
    pub fn ensemble(mut self, particles: Particles) -> Self {
        self.population = Population::Given(particles);
        self
    }

    /// Make the species adiabatic: no particles, constant background.
    pub fn adiabatic(mut self) -> Self {
        self.population = Population::Adiabatic;
        self
    }

    /// Build the species, sampling its particles if needed.
    ///
    /// # Errors
    ///
    /// - [`SpeciesError::InvalidParameter`] for a non-finite charge or a
    ///   mass or temperature that is not finite and positive.
    /// - [`SpeciesError::NoParticles`] for a sampled species with zero
    ///   particles.
    /// - Sampler errors such as [`SpeciesError::SamplingExhausted`].
    pub fn build(self) -> Result<Species, SpeciesError> {
        if !self.charge.is_finite() {
            return Err(SpeciesError::InvalidParameter {
                name: "charge",
                value: self.charge,
            });
        }
        let mass = require_positive("mass", self.mass)?;
        let temperature = require_positive("temperature", self.temperature)?;

        let model = match self.population {
            Population::Adiabatic => Model::Adiabatic,
            Population::Given(particles) => Model::Kinetic(particles),
            Population::Sampled { particles, sampler } => {
                let mut sampler = match sampler {
                    Some(s) => s,
                    None => RejectionSampler::builder().build()?,
                };
                Model::Kinetic(Particles::sample(particles, &mut sampler)?)
            }
        };

        Ok(Species {
            name: self.name,
            charge: self.charge,
            mass,
            temperature,
            vth: (2.0 * temperature / mass).sqrt(),
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Velocity;

    struct Uniform(f64);

    impl ElectricField for Uniform {
        fn dt(&self) -> f64 {
            0.01
        }

        fn evaluate_field_at(&self, _x: f64) -> f64 {
            self.0
        }
    }

    fn single(x: f64, v: f64) -> Species {
        Species::builder("test")
            .ensemble(Particles::new(vec![x], Velocity::longitudinal(vec![v])).unwrap())
            .build()
            .unwrap()
    }

    fn position(s: &Species) -> f64 {
        s.particles().unwrap().positions()[0]
    }

    fn velocity(s: &Species) -> f64 {
        s.particles().unwrap().velocities().x[0]
    }

    #[test]
    fn default_species_matches_reference_parameters() {
        let s = Species::builder("electrons").build().unwrap();
        assert_eq!(s.len(), 10);
        assert_eq!(s.temperature(), 1.0);
        assert_eq!(s.charge(), 1.0);
        assert_eq!(s.mass(), 1.0);
        assert!(s.is_kinetic());
        for &w in s.particles().unwrap().weights() {
            assert_eq!(w, 1.0 / 10.0);
        }
    }

    #[test]
    fn explicit_parameters_are_kept() {
        let s = Species::builder("ions")
            .temperature(1.0)
            .charge(-1.0)
            .mass(1836.0)
            .particles(1)
            .build()
            .unwrap();
        assert_eq!((s.len(), s.charge(), s.mass()), (1, -1.0, 1836.0));

        let s = Species::builder("heavy")
            .temperature(3.14159)
            .charge(2.0)
            .mass(9.0)
            .particles(34)
            .build()
            .unwrap();
        assert_eq!(s.len(), 34);
        assert_eq!(s.temperature(), 3.14159);
        assert_eq!(s.vth(), (2.0 * 3.14159 / 9.0f64).sqrt());
    }

    #[test]
    fn adiabatic_species_has_background_only() {
        let s = Species::builder("ions").adiabatic().build().unwrap();
        assert!(!s.is_kinetic());
        assert_eq!(s.temperature(), 1.0);
        assert_eq!(s.charge(), 1.0);
        assert_eq!(s.mass(), 1.0);
        assert_eq!(
            s.charge_contribution(),
            ChargeContribution::Background { density: 1.0 }
        );
    }

    #[test]
    fn builder_rejects_bad_physics() {
        assert!(Species::builder("s").mass(0.0).build().is_err());
        assert!(Species::builder("s").temperature(-1.0).build().is_err());
        assert!(Species::builder("s").charge(f64::NAN).build().is_err());
        assert_eq!(
            Species::builder("s").particles(0).build(),
            Err(SpeciesError::NoParticles)
        );
    }

    #[test]
    fn stationary_particle_in_zero_field_stays_put() {
        let mut s = single(0.3, 0.0);
        s.push(&Uniform(0.0)).unwrap();
        assert_eq!(position(&s), 0.3);
        assert_eq!(velocity(&s), 0.0);
    }

    #[test]
    fn kick_drift_kick_in_uniform_field() {
        let mut s = single(0.5, 0.0);
        let (dt, e, q, m, vth) = (0.01, 2.0, 1.0, 1.0, s.vth());
        s.push(&Uniform(e)).unwrap();

        let mut v = 0.0;
        v += 0.5 * dt * e * q / (m * vth);
        let x = 0.5 + dt * v * vth;
        v += 0.5 * dt * e * q / (m * vth);
        assert_eq!(position(&s), x);
        assert_eq!(velocity(&s), v);
    }

    #[test]
    fn push_wraps_through_both_ends() {
        let vth = 2.0f64.sqrt();
        let mut right = single(0.999, 1.0 / (0.01 * vth) * 0.002);
        right.push(&Uniform(0.0)).unwrap();
        assert!((position(&right) - 0.001).abs() < 1e-12);

        let mut left = single(0.001, -1.0 / (0.01 * vth) * 0.002);
        left.push(&Uniform(0.0)).unwrap();
        assert!((position(&left) - 0.999).abs() < 1e-12);
    }

    #[test]
    fn wrap_unit_lands_in_range() {
        assert_eq!(wrap_unit(1.0), 0.0);
        assert_eq!(wrap_unit(-1e-20), 0.0);
        assert_eq!(wrap_unit(-0.25), 0.75);
        assert_eq!(wrap_unit(2.5), 0.5);
        assert_eq!(wrap_unit(-2.5), 0.5);
    }

    #[test]
    fn adiabatic_push_is_a_no_op() {
        let mut s = Species::builder("ions").adiabatic().build().unwrap();
        let before = s.clone();
        s.push(&Uniform(5.0)).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn non_finite_field_is_reported() {
        let mut s = single(0.5, 0.0);
        assert_eq!(
            s.push(&Uniform(f64::NAN)),
            Err(SpeciesError::NonFiniteParticle { index: 0 })
        );
    }

    #[test]
    fn kinetic_energy_of_unit_beam() {
        // ½ m vth² Σ w v² with v = 1 everywhere.
        let s = Species::builder("beam")
            .mass(2.0)
            .temperature(3.0)
            .ensemble(
                Particles::new(vec![0.1, 0.6], Velocity::longitudinal(vec![1.0, -1.0])).unwrap(),
            )
            .build()
            .unwrap();
        assert!((s.kinetic_energy() - 3.0).abs() < 1e-12);
    }
}
