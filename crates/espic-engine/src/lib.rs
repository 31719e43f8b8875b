//! Configuration, stepping protocol and simulation driver for espic.
//!
//! The engine ties the grid ([`espic_mesh`]) and the species
//! ([`espic_species`]) together:
//!
//! - [`SimulationConfig`]: serde/TOML configuration with validation.
//! - [`Plasma`]: the species registry, in deposit order.
//! - [`step`] / [`evolve`]: the push → deposit → solve → derive-field
//!   cycle as free functions over an explicit mesh and plasma.
//! - [`Simulation`]: an owning driver that runs the cycle to completion,
//!   records [`StepMetrics`] and [`Diagnostics`], and logs progress.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod metrics;
pub mod plasma;
pub mod simulation;
pub mod stepping;

pub use config::{read_toml, ConfigError, SimulationConfig, SpeciesConfig, SpeciesModel};
pub use diagnostics::Diagnostics;
pub use metrics::StepMetrics;
pub use plasma::Plasma;
pub use simulation::Simulation;
pub use stepping::{evolve, step, steps_taken, StepError};
