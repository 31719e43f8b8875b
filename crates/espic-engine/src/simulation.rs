//! The simulation driver.
//!
//! [`Simulation`] owns the mesh and the plasma, runs the stepping
//! protocol, and keeps the latest [`StepMetrics`]. [`Diagnostics`] are
//! measured on demand and on report steps only.
//! Progress goes to the `log` facade; installing a logger is up to the
//! binary.

use espic_mesh::Mesh;
use espic_species::{RejectionSampler, Species};

use crate::config::{ConfigError, SimulationConfig, SpeciesConfig, SpeciesModel};
use crate::diagnostics::Diagnostics;
use crate::metrics::StepMetrics;
use crate::plasma::Plasma;
use crate::stepping::{self, StepError};

/// A mesh and a plasma advanced together.
///
/// # Example
///
/// ```
/// use espic_engine::{Simulation, SimulationConfig, SpeciesConfig};
///
/// let config = SimulationConfig {
///     steps: 5,
///     species: vec![SpeciesConfig::adiabatic("ions")],
///     ..SimulationConfig::default()
/// };
/// let mut sim = Simulation::from_config(&config).unwrap();
/// sim.run().unwrap();
/// assert_eq!(sim.steps_completed(), 5);
/// ```
#[derive(Debug)]
pub struct Simulation {
    mesh: Mesh,
    plasma: Plasma,
    steps_completed: u64,
    report_interval: u64,
    last_metrics: StepMetrics,
}

impl Simulation {
    /// Default progress-report interval, in steps.
    pub const DEFAULT_REPORT_INTERVAL: u64 = 100;

    /// Wrap an existing mesh and plasma.
    ///
    /// The run length is the mesh's `nt`.
    pub fn new(mesh: Mesh, plasma: Plasma) -> Self {
        Self {
            steps_completed: stepping::steps_taken(&mesh),
            mesh,
            plasma,
            report_interval: Self::DEFAULT_REPORT_INTERVAL,
            last_metrics: StepMetrics::default(),
        }
    }

    /// Validate `config`, build the mesh and sample every species.
    ///
    /// Each kinetic species gets its own sampler seeded with
    /// [`SimulationConfig::species_seed`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] from validation, mesh
    /// construction or species construction.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mesh = Mesh::new(config.intervals, config.dt, config.steps)?;

        let mut plasma = Plasma::new();
        for (index, sc) in config.species.iter().enumerate() {
            let species = build_species(sc, config.species_seed(index)).map_err(|source| {
                ConfigError::Species {
                    name: sc.name.clone(),
                    source,
                }
            })?;
            log::debug!(
                "species '{}': q={} m={} T={} particles={}",
                species.name(),
                species.charge(),
                species.mass(),
                species.temperature(),
                species.len()
            );
            plasma.insert(species)?;
        }

        let mut sim = Self::new(mesh, plasma);
        sim.report_interval = config.report_interval;
        Ok(sim)
    }

    /// Set the progress-report interval; 0 disables reporting.
    pub fn set_report_interval(&mut self, steps: u64) {
        self.report_interval = steps;
    }

    /// Override the total number of steps.
    pub fn set_steps(&mut self, steps: u64) {
        self.mesh.set_nt(steps);
    }

    /// Run one step.
    ///
    /// Diagnostics are only measured when a report is due or debug
    /// logging is enabled.
    ///
    /// # Errors
    ///
    /// See [`step`](crate::step).
    pub fn step(&mut self) -> Result<&StepMetrics, StepError> {
        self.last_metrics = stepping::step(&mut self.mesh, &mut self.plasma)?;
        self.steps_completed += 1;

        let report_due =
            self.report_interval > 0 && self.steps_completed % self.report_interval == 0;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("step {}: {}", self.steps_completed, self.diagnostics());
        }
        if report_due {
            log::info!(
                "step {}/{} {} ({} us)",
                self.steps_completed,
                self.mesh.nt(),
                self.diagnostics(),
                self.last_metrics.total_us
            );
        }
        Ok(&self.last_metrics)
    }

    /// Run until `nt` steps have completed.
    ///
    /// Returns the metrics summed over the steps run by this call.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step.
    pub fn run(&mut self) -> Result<StepMetrics, StepError> {
        let nt = self.mesh.nt();
        log::info!(
            "running {} steps: {} intervals, dt={}, {} species, {} particles",
            nt.saturating_sub(self.steps_completed),
            self.mesh.nintervals(),
            self.mesh.dt(),
            self.plasma.len(),
            self.plasma.particle_count()
        );

        let mut total = StepMetrics::default();
        while !self.is_finished() {
            let next = self.steps_completed + 1;
            if let Err(e) = self.step() {
                log::error!("step {next} failed: {e}");
                return Err(e);
            }
            total.accumulate(&self.last_metrics);
        }

        log::info!(
            "finished {} steps in {:.3} s: {}",
            self.steps_completed,
            total.total_us as f64 * 1e-6,
            self.diagnostics()
        );
        Ok(total)
    }

    /// Whether `nt` steps have completed.
    pub fn is_finished(&self) -> bool {
        self.steps_completed >= self.mesh.nt()
    }

    /// Steps completed so far.
    pub fn steps_completed(&self) -> u64 {
        self.steps_completed
    }

    /// The grid.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The species.
    pub fn plasma(&self) -> &Plasma {
        &self.plasma
    }

    /// Metrics of the latest step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Measure the current diagnostics.
    ///
    /// Walks every particle, so call it when a value is needed rather
    /// than every step.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::measure(&self.mesh, &self.plasma)
    }

    /// Give back the mesh and the plasma.
    pub fn into_parts(self) -> (Mesh, Plasma) {
        (self.mesh, self.plasma)
    }
}

fn build_species(sc: &SpeciesConfig, seed: u64) -> Result<Species, espic_species::SpeciesError> {
    let builder = Species::builder(sc.name.clone())
        .charge(sc.charge)
        .mass(sc.mass)
        .temperature(sc.temperature);

    match sc.model {
        SpeciesModel::Adiabatic => builder.adiabatic().build(),
        SpeciesModel::Kinetic => {
            let sampler = RejectionSampler::builder()
                .distribution(sc.distribution)
                .max_velocity(sc.max_velocity)
                .max_attempts(sc.max_attempts)
                .seed(seed)
                .build()?;
            builder.particles(sc.particles).sampler(sampler).build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espic_species::{Distribution, SpeciesError};

    fn maxwellian(name: &str, charge: f64, particles: usize) -> SpeciesConfig {
        SpeciesConfig {
            charge,
            particles,
            distribution: Distribution::Maxwellian,
            ..SpeciesConfig::kinetic(name)
        }
    }

    fn config(steps: u64) -> SimulationConfig {
        SimulationConfig {
            intervals: 16,
            steps,
            seed: 3,
            species: vec![
                maxwellian("electrons", -1.0, 256),
                SpeciesConfig::adiabatic("ions"),
            ],
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn from_config_builds_every_species() {
        let sim = Simulation::from_config(&config(10)).unwrap();
        assert_eq!(sim.plasma().len(), 2);
        assert_eq!(sim.plasma().particle_count(), 256);
        assert_eq!(sim.mesh().nintervals(), 16);
        assert_eq!(sim.steps_completed(), 0);
        assert!(!sim.is_finished());
    }

    #[test]
    fn run_completes_and_conserves_charge() {
        let mut sim = Simulation::from_config(&config(20)).unwrap();
        let total = sim.run().unwrap();
        assert!(sim.is_finished());
        assert_eq!(sim.steps_completed(), 20);
        assert_eq!(total.particles_pushed, 20 * 256);
        assert!((sim.mesh().t() - 0.2).abs() < 1e-12);
        // -1 from the electrons, +1 per node from the ions.
        let expected = -1.0 + 16.0;
        assert!((sim.diagnostics().total_charge - expected).abs() < 1e-9);
        assert!(sim.diagnostics().total_energy().is_finite());
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = || {
            let mut sim = Simulation::from_config(&config(5)).unwrap();
            sim.run().unwrap();
            sim.into_parts().0.potential().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn species_get_distinct_seeds() {
        let mut cfg = config(1);
        cfg.species = vec![maxwellian("a", -1.0, 32), maxwellian("b", -1.0, 32)];
        let sim = Simulation::from_config(&cfg).unwrap();
        let a = sim.plasma().get("a").unwrap().particles().unwrap();
        let b = sim.plasma().get("b").unwrap().particles().unwrap();
        assert_ne!(a.positions(), b.positions());
    }

    #[test]
    fn invalid_species_parameters_are_wrapped() {
        let mut cfg = config(1);
        cfg.species[0].mass = -1.0;
        assert_eq!(
            Simulation::from_config(&cfg).unwrap_err(),
            ConfigError::Species {
                name: "electrons".into(),
                source: SpeciesError::InvalidParameter {
                    name: "mass",
                    value: -1.0
                },
            }
        );
    }

    #[test]
    fn validation_runs_first() {
        let mut cfg = config(1);
        cfg.intervals = 1;
        assert_eq!(
            Simulation::from_config(&cfg).unwrap_err(),
            ConfigError::TooFewIntervals { intervals: 1 }
        );
    }

    #[test]
    fn diagnostics_track_the_state_without_reports() {
        let mut sim = Simulation::from_config(&config(3)).unwrap();
        sim.set_report_interval(0);
        sim.run().unwrap();
        let d = sim.diagnostics();
        assert_eq!(d.t, sim.mesh().t());
        assert_eq!(d.total_charge, sim.mesh().total_charge());
        let electrons = sim.plasma().get("electrons").unwrap();
        assert_eq!(d.kinetic_energy, electrons.kinetic_energy());
    }

    #[test]
    fn set_steps_extends_the_run() {
        let mut sim = Simulation::from_config(&config(2)).unwrap();
        sim.run().unwrap();
        sim.set_steps(4);
        assert!(!sim.is_finished());
        sim.run().unwrap();
        assert_eq!(sim.steps_completed(), 4);
    }
}
