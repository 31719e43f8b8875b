//! Benchmark profiles for the espic particle-in-cell kernel.
//!
//! Provides pre-built [`SimulationConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 256 intervals, 100K Maxwellian electrons
//!   over an adiabatic ion background
//! - [`stress_profile`]: 4096 intervals, 1M electrons
//! - [`two_stream_profile`]: 10K electrons in two beams at `±1`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use espic_engine::{Plasma, Simulation, SimulationConfig, SpeciesConfig};
use espic_mesh::Mesh;
use espic_species::Distribution;

fn electrons_and_ions(particles: usize, distribution: Distribution) -> Vec<SpeciesConfig> {
    vec![
        SpeciesConfig {
            charge: -1.0,
            particles,
            distribution,
            ..SpeciesConfig::kinetic("electrons")
        },
        SpeciesConfig::adiabatic("ions"),
    ]
}

/// Reference benchmark profile: 256 intervals, 100K Maxwellian electrons.
pub fn reference_profile(seed: u64) -> SimulationConfig {
    SimulationConfig {
        intervals: 256,
        steps: 100,
        seed,
        report_interval: 0,
        species: electrons_and_ions(100_000, Distribution::Maxwellian),
        ..SimulationConfig::default()
    }
}

/// Stress benchmark profile: 4096 intervals, 1M Maxwellian electrons.
pub fn stress_profile(seed: u64) -> SimulationConfig {
    SimulationConfig {
        intervals: 4096,
        species: electrons_and_ions(1_000_000, Distribution::Maxwellian),
        ..reference_profile(seed)
    }
}

/// Two beams at `±1`, 10K electrons.
///
/// The beams are warmer than the default (sharpness 50 rather than 1e8)
/// so that sampling stays cheap enough to repeat per iteration.
pub fn two_stream_profile(seed: u64) -> SimulationConfig {
    let beams = Distribution::TwoStream {
        beam_velocity: 1.0,
        sharpness: 50.0,
    };
    SimulationConfig {
        species: electrons_and_ions(10_000, beams),
        ..reference_profile(seed)
    }
}

/// Build a profile and hand back its mesh and plasma, ready to step.
///
/// # Panics
///
/// Panics if the profile does not build; profiles are fixed and valid.
pub fn build(config: &SimulationConfig) -> (Mesh, Plasma) {
    match Simulation::from_config(config) {
        Ok(sim) => sim.into_parts(),
        Err(e) => panic!("benchmark profile must build: {e}"),
    }
}
