//! Simulation configuration, TOML loading, validation, and error types.
//!
//! [`SimulationConfig`] is the input for [`Simulation::from_config`](crate::Simulation::from_config).
//! [`validate()`](SimulationConfig::validate) checks structural invariants
//! before anything is allocated or sampled.
//!
//! ```toml
//! intervals = 64
//! dt = 0.01
//! steps = 2000
//! seed = 7
//!
//! [[species]]
//! name = "electrons"
//! charge = -1.0
//! particles = 10000
//! distribution = { type = "maxwellian" }
//!
//! [[species]]
//! name = "ions"
//! model = "adiabatic"
//! ```

use std::error::Error;
use std::fmt;
use std::path::Path;

use espic_mesh::{Mesh, MeshError};
use espic_species::{Distribution, RejectionSampler, SpeciesError};
use serde::{Deserialize, Serialize};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading, validating or realizing a configuration.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    TomlRead {
        /// Path that was read.
        path: String,
        /// Underlying I/O error message.
        reason: String,
    },
    /// The configuration text is not valid TOML for [`SimulationConfig`].
    TomlParse {
        /// Parser error message.
        reason: String,
    },
    /// Fewer than two periodic intervals.
    TooFewIntervals {
        /// The configured interval count.
        intervals: usize,
    },
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The invalid value.
        value: f64,
    },
    /// A species has an empty name.
    EmptySpeciesName,
    /// Two species share a name.
    DuplicateSpecies {
        /// The repeated name.
        name: String,
    },
    /// A kinetic species is configured with zero particles.
    NoParticles {
        /// Species name.
        species: String,
    },
    /// Mesh construction failed.
    Mesh(MeshError),
    /// Species construction or sampling failed.
    Species {
        /// Species name.
        name: String,
        /// The underlying failure.
        source: SpeciesError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlRead { path, reason } => write!(f, "cannot read {path}: {reason}"),
            Self::TomlParse { reason } => write!(f, "invalid configuration: {reason}"),
            Self::TooFewIntervals { intervals } => {
                write!(f, "intervals must be at least 2, got {intervals}")
            }
            Self::InvalidTimeStep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::EmptySpeciesName => write!(f, "species name must not be empty"),
            Self::DuplicateSpecies { name } => write!(f, "duplicate species name '{name}'"),
            Self::NoParticles { species } => {
                write!(f, "kinetic species '{species}' needs at least one particle")
            }
            Self::Mesh(e) => write!(f, "mesh: {e}"),
            Self::Species { name, source } => write!(f, "species '{name}': {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mesh(e) => Some(e),
            Self::Species { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<MeshError> for ConfigError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

// ── SpeciesConfig ──────────────────────────────────────────────────

/// Whether a configured species is tracked with particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesModel {
    /// Particles, pushed every step.
    #[default]
    Kinetic,
    /// Constant background density equal to the charge.
    Adiabatic,
}

/// One `[[species]]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesConfig {
    /// Unique species name.
    pub name: String,
    /// Kinetic or adiabatic. Default: kinetic.
    #[serde(default)]
    pub model: SpeciesModel,
    /// Normalized charge. Default: 1.
    #[serde(default = "default_unit")]
    pub charge: f64,
    /// Normalized mass. Default: 1.
    #[serde(default = "default_unit")]
    pub mass: f64,
    /// Normalized temperature. Default: 1.
    #[serde(default = "default_unit")]
    pub temperature: f64,
    /// Particle count for a kinetic species. Default: 10.
    #[serde(default = "default_particles")]
    pub particles: usize,
    /// Half-width of the trial velocity range. Default: 6.
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    /// Consecutive rejections before sampling gives up. Default: 10⁷.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    /// Initial phase-space distribution. Default: two beams at `±1`.
    #[serde(default)]
    pub distribution: Distribution,
}

impl SpeciesConfig {
    /// A kinetic species with every other setting at its default.
    pub fn kinetic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: SpeciesModel::Kinetic,
            charge: default_unit(),
            mass: default_unit(),
            temperature: default_unit(),
            particles: default_particles(),
            max_velocity: default_max_velocity(),
            max_attempts: default_max_attempts(),
            distribution: Distribution::default(),
        }
    }

    /// An adiabatic species with every other setting at its default.
    pub fn adiabatic(name: impl Into<String>) -> Self {
        Self {
            model: SpeciesModel::Adiabatic,
            ..Self::kinetic(name)
        }
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for constructing a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of periodic grid cells. Default: 10. Minimum: 2.
    #[serde(default = "default_intervals")]
    pub intervals: usize,
    /// Time-step size. Default: 0.01.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Number of steps to run. Default: 1000.
    #[serde(default = "default_steps")]
    pub steps: u64,
    /// Base RNG seed for initial sampling. Default: 0.
    #[serde(default)]
    pub seed: u64,
    /// Log a progress line every this many steps; 0 disables. Default: 100.
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
    /// Species in deposit order.
    #[serde(default)]
    pub species: Vec<SpeciesConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            intervals: default_intervals(),
            dt: default_dt(),
            steps: default_steps(),
            seed: 0,
            report_interval: default_report_interval(),
            species: Vec::new(),
        }
    }
}

fn default_unit() -> f64 {
    1.0
}

fn default_particles() -> usize {
    espic_species::Species::DEFAULT_PARTICLES
}

fn default_max_velocity() -> f64 {
    RejectionSampler::DEFAULT_MAX_VELOCITY
}

fn default_max_attempts() -> u64 {
    RejectionSampler::DEFAULT_MAX_ATTEMPTS
}

fn default_intervals() -> usize {
    Mesh::DEFAULT_INTERVALS
}

fn default_dt() -> f64 {
    Mesh::DEFAULT_DT
}

fn default_steps() -> u64 {
    Mesh::DEFAULT_STEPS
}

fn default_report_interval() -> u64 {
    100
}

impl SimulationConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlParse`] on syntax errors, unknown keys or
    /// mistyped values. The result is not validated.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::TomlParse {
            reason: e.to_string(),
        })
    }

    /// Serialize the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlParse`] if a value has no TOML form.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::TomlParse {
            reason: e.to_string(),
        })
    }

    /// Check structural invariants.
    ///
    /// Physical parameters (mass, temperature, distribution shape) are
    /// checked when the species are built.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. The Poisson system needs at least one interior node.
        if self.intervals < 2 {
            return Err(ConfigError::TooFewIntervals {
                intervals: self.intervals,
            });
        }
        // 2. dt must be finite and positive.
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { value: self.dt });
        }
        // 3. Species names are non-empty and unique; kinetic species have particles.
        let mut seen = std::collections::HashSet::new();
        for s in &self.species {
            if s.name.is_empty() {
                return Err(ConfigError::EmptySpeciesName);
            }
            if !seen.insert(s.name.as_str()) {
                return Err(ConfigError::DuplicateSpecies {
                    name: s.name.clone(),
                });
            }
            if s.model == SpeciesModel::Kinetic && s.particles == 0 {
                return Err(ConfigError::NoParticles {
                    species: s.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Seed for the sampler of the species at `index`.
    pub fn species_seed(&self, index: usize) -> u64 {
        self.seed ^ index as u64
    }
}

/// Read and parse a TOML configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::TomlRead`] if the file cannot be read and
/// [`ConfigError::TomlParse`] if its contents do not parse.
pub fn read_toml(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::TomlRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    SimulationConfig::from_toml_str(&text)
}
