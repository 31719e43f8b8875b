//! espic: a one-dimensional electrostatic particle-in-cell plasma kernel.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all espic sub-crates. For most users, adding `espic` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use espic::prelude::*;
//!
//! let mut mesh = Mesh::builder().intervals(32).steps(50).build().unwrap();
//! let sampler = RejectionSampler::builder()
//!     .distribution(Distribution::Maxwellian)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! let mut plasma = Plasma::new();
//! plasma
//!     .insert(
//!         Species::builder("electrons")
//!             .charge(-1.0)
//!             .particles(1000)
//!             .sampler(sampler)
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//! plasma
//!     .insert(Species::builder("ions").adiabatic().build().unwrap())
//!     .unwrap();
//!
//! evolve(&mut mesh, &mut plasma).unwrap();
//! assert!((mesh.t() - 0.5).abs() < 1e-9);
//! assert_eq!(mesh.potential()[0], mesh.potential()[32]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `espic-core` | Coupling traits, invariant errors, tolerances |
//! | [`mesh`] | `espic-mesh` | Grid, deposition, Poisson solve, interpolation |
//! | [`species`] | `espic-species` | Species, particles, push, sampling |
//! | [`engine`] | `espic-engine` | Configuration, stepping, driver, diagnostics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Coupling traits and invariant errors (`espic-core`).
///
/// [`types::ElectricField`] and [`types::ChargeSource`] are the seams
/// between the grid and the species.
pub use espic_core as types;

/// The periodic grid (`espic-mesh`).
///
/// [`mesh::Mesh`] owns the field arrays; [`mesh::get_bracket`] is the
/// shared periodic bracket search.
pub use espic_mesh as mesh;

/// Species and initial sampling (`espic-species`).
pub use espic_species as species;

/// Configuration and the stepping protocol (`espic-engine`).
///
/// [`engine::step`] runs one cycle; [`engine::Simulation`] runs a whole
/// configured simulation.
pub use espic_engine as engine;

/// Common imports for typical espic usage.
///
/// ```rust
/// use espic::prelude::*;
/// ```
pub mod prelude {
    // Core traits
    pub use espic_core::{ChargeSource, ElectricField, InvariantError};

    // Grid
    pub use espic_mesh::{Mesh, MeshError};

    // Species
    pub use espic_species::{
        Distribution, Initializer, Particles, RejectionSampler, Species, SpeciesError, Velocity,
    };

    // Engine
    pub use espic_engine::{
        evolve, read_toml, step, ConfigError, Diagnostics, Plasma, Simulation, SimulationConfig,
        SpeciesConfig, StepError, StepMetrics,
    };
}
