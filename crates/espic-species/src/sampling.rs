//! Initial particle sampling.
//!
//! [`RejectionSampler`] draws trial triples `(pos, vel, r)` with
//! `pos ~ U[0, 1)`, `vel ~ U[-vmax, vmax)` and `r ~ U[0, 1)`, and keeps the
//! particle when `r < f(pos, vel)` for the configured [`Distribution`].
//!
//! Sampling is deterministic: the RNG is a `ChaCha8Rng` seeded from a
//! `u64`, so equal seeds produce identical ensembles.

use crate::error::{require_positive, SpeciesError};
use crate::particles::Velocity;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Source of initial particle phase-space coordinates.
pub trait Initializer {
    /// Produce `n` positions in `[0, 1)` and `n` velocities.
    ///
    /// # Errors
    ///
    /// Implementations return [`SpeciesError`] when they cannot produce
    /// `n` particles.
    fn initialize(&mut self, n: usize) -> Result<(Vec<f64>, Velocity), SpeciesError>;
}

/// Target phase-space density `f(x, v)` for rejection sampling.
///
/// Velocities are in units of the species thermal velocity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform in space, Maxwellian in velocity: `exp(-v²)`.
    Maxwellian,
    /// Maxwellian with a cosine density perturbation:
    /// `(1 + a cos(2π k x)) exp(-v²) / (1 + a)`.
    Perturbed {
        /// Relative perturbation amplitude `a`.
        amplitude: f64,
        /// Integer wave number `k` of the perturbation.
        mode: u32,
    },
    /// Two counter-propagating cold beams at `±u`:
    /// `½ s (exp(-s (v - u)²) + exp(-s (v + u)²))`.
    TwoStream {
        /// Beam velocity `u`.
        beam_velocity: f64,
        /// Beam sharpness `s`; larger is colder.
        sharpness: f64,
    },
}

impl Default for Distribution {
    /// Two beams at `±1` with sharpness `1e8`.
    fn default() -> Self {
        Self::TwoStream {
            beam_velocity: 1.0,
            sharpness: 1e8,
        }
    }
}

impl Distribution {
    /// Evaluate the (unnormalized) density at `(x, v)`.
    pub fn density(&self, x: f64, v: f64) -> f64 {
        match *self {
            Self::Maxwellian => (-v * v).exp(),
            Self::Perturbed { amplitude, mode } => {
                (1.0 + amplitude * (2.0 * PI * f64::from(mode) * x).cos()) * (-v * v).exp()
                    / (1.0 + amplitude)
            }
            Self::TwoStream {
                beam_velocity: u,
                sharpness: s,
            } => {
                0.5 * s * ((-s * (v - u) * (v - u)).exp() + (-s * (v + u) * (v + u)).exp())
            }
        }
    }

    fn validate(&self) -> Result<(), SpeciesError> {
        match *self {
            Self::Maxwellian => Ok(()),
            Self::Perturbed { amplitude, .. } => {
                if amplitude.is_finite() && (0.0..1.0).contains(&amplitude) {
                    Ok(())
                } else {
                    Err(SpeciesError::InvalidParameter {
                        name: "amplitude",
                        value: amplitude,
                    })
                }
            }
            Self::TwoStream {
                beam_velocity,
                sharpness,
            } => {
                if !beam_velocity.is_finite() {
                    return Err(SpeciesError::InvalidParameter {
                        name: "beam_velocity",
                        value: beam_velocity,
                    });
                }
                require_positive("sharpness", sharpness).map(|_| ())
            }
        }
    }
}

/// Seeded rejection sampler over a [`Distribution`].
///
/// Constructed via [`RejectionSampler::builder`].
#[derive(Clone, Debug)]
pub struct RejectionSampler {
    distribution: Distribution,
    max_velocity: f64,
    max_attempts: u64,
    rng: ChaCha8Rng,
}

/// Builder for [`RejectionSampler`].
#[derive(Clone, Debug)]
pub struct RejectionSamplerBuilder {
    distribution: Distribution,
    max_velocity: f64,
    max_attempts: u64,
    seed: u64,
}

impl RejectionSampler {
    /// Default half-width of the trial velocity range.
    pub const DEFAULT_MAX_VELOCITY: f64 = 6.0;
    /// Default limit on consecutive rejected trials per particle.
    pub const DEFAULT_MAX_ATTEMPTS: u64 = 10_000_000;

    /// Create a new builder for configuring a `RejectionSampler`.
    pub fn builder() -> RejectionSamplerBuilder {
        RejectionSamplerBuilder {
            distribution: Distribution::default(),
            max_velocity: Self::DEFAULT_MAX_VELOCITY,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            seed: 0,
        }
    }

    /// The target distribution.
    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Draw one accepted `(pos, vel)` pair.
    fn draw(&mut self) -> Result<(f64, f64), SpeciesError> {
        let vmax = self.max_velocity;
        for _ in 0..self.max_attempts {
            let pos: f64 = self.rng.random();
            let vel: f64 = self.rng.random_range(-vmax..vmax);
            let r: f64 = self.rng.random();
            if r < self.distribution.density(pos, vel) {
                return Ok((pos, vel));
            }
        }
        Err(SpeciesError::SamplingExhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Initializer for RejectionSampler {
    fn initialize(&mut self, n: usize) -> Result<(Vec<f64>, Velocity), SpeciesError> {
        let mut x = Vec::with_capacity(n);
        let mut vx = Vec::with_capacity(n);
        for _ in 0..n {
            let (pos, vel) = self.draw()?;
            x.push(pos);
            vx.push(vel);
        }
        log::debug!("sampled {n} particles from {:?}", self.distribution);
        Ok((x, Velocity::longitudinal(vx)))
    }
}

impl RejectionSamplerBuilder {
    /// Set the target distribution (default: two beams at `±1`).
    pub fn distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the trial velocity half-width (default: 6). Must be > 0.
    pub fn max_velocity(mut self, max_velocity: f64) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Set the per-particle rejection limit (default: 10⁷). Must be > 0.
    pub fn max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the RNG seed (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the sampler, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesError::InvalidParameter`] if `max_velocity` is not
    /// finite and positive, `max_attempts` is zero, or the distribution
    /// parameters are out of range.
    pub fn build(self) -> Result<RejectionSampler, SpeciesError> {
        require_positive("max_velocity", self.max_velocity)?;
        if self.max_attempts == 0 {
            return Err(SpeciesError::InvalidParameter {
                name: "max_attempts",
                value: 0.0,
            });
        }
        self.distribution.validate()?;

        Ok(RejectionSampler {
            distribution: self.distribution,
            max_velocity: self.max_velocity,
            max_attempts: self.max_attempts,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn maxwellian(seed: u64) -> RejectionSampler {
        RejectionSampler::builder()
            .distribution(Distribution::Maxwellian)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn samples_stay_in_trial_box() {
        let (x, v) = maxwellian(7).initialize(500).unwrap();
        assert_eq!(x.len(), 500);
        assert!(x.iter().all(|&x| (0.0..1.0).contains(&x)));
        assert!(v.x.iter().all(|&v| (-6.0..=6.0).contains(&v)));
        assert!(v.y.iter().chain(&v.z).all(|&v| v == 0.0));
    }

    #[test]
    fn equal_seeds_give_identical_ensembles() {
        let a = maxwellian(42).initialize(64).unwrap();
        let b = maxwellian(42).initialize(64).unwrap();
        let c = maxwellian(43).initialize(64).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn two_stream_samples_sit_on_the_beams() {
        let mut sampler = RejectionSampler::builder().seed(3).build().unwrap();
        let (_, v) = sampler.initialize(20).unwrap();
        for &v in &v.x {
            assert!((v.abs() - 1.0).abs() < 1e-2, "velocity {v} off the beams");
        }
    }

    #[test]
    fn maxwellian_velocity_moments() {
        // exp(-v²) has mean 0 and variance 1/2.
        let (_, v) = maxwellian(11).initialize(20_000).unwrap();
        let n = v.x.len() as f64;
        let mean = v.x.iter().sum::<f64>() / n;
        let var = v.x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        assert!(mean.abs() < 0.03, "mean {mean}");
        assert!((var - 0.5).abs() < 0.03, "variance {var}");
    }

    #[test]
    fn impossible_distribution_exhausts() {
        // No acceptance is possible with beams far outside the trial box.
        let mut sampler = RejectionSampler::builder()
            .distribution(Distribution::TwoStream {
                beam_velocity: 100.0,
                sharpness: 1e8,
            })
            .max_attempts(1000)
            .build()
            .unwrap();
        assert_eq!(
            sampler.initialize(1),
            Err(SpeciesError::SamplingExhausted { attempts: 1000 })
        );
    }

    #[test]
    fn builder_rejects_bad_parameters() {
        assert!(RejectionSampler::builder().max_velocity(0.0).build().is_err());
        assert!(RejectionSampler::builder().max_attempts(0).build().is_err());
        assert!(RejectionSampler::builder()
            .distribution(Distribution::Perturbed {
                amplitude: 1.5,
                mode: 1
            })
            .build()
            .is_err());
        assert!(RejectionSampler::builder()
            .distribution(Distribution::TwoStream {
                beam_velocity: 1.0,
                sharpness: -1.0
            })
            .build()
            .is_err());
    }

    #[test]
    fn distribution_deserializes_from_tagged_table() {
        #[derive(Deserialize)]
        struct Wrapper {
            distribution: Distribution,
        }
        let w: Wrapper = toml::from_str(
            r#"
            [distribution]
            type = "perturbed"
            amplitude = 0.01
            mode = 2
            "#,
        )
        .unwrap();
        assert_eq!(
            w.distribution,
            Distribution::Perturbed {
                amplitude: 0.01,
                mode: 2
            }
        );
    }

    proptest! {
        #[test]
        fn densities_are_non_negative(x in 0.0f64..1.0, v in -6.0f64..6.0, a in 0.0f64..0.99, k in 0u32..8) {
            prop_assert!(Distribution::Maxwellian.density(x, v) >= 0.0);
            let perturbed = Distribution::Perturbed { amplitude: a, mode: k };
            prop_assert!(perturbed.density(x, v) >= 0.0);
            prop_assert!(Distribution::default().density(x, v) >= 0.0);
        }
    }
}
