//! Per-step performance metrics for the stepping protocol.
//!
//! [`StepMetrics`] captures wall-clock timing for each phase of a single
//! step, for progress reporting and profiling.

/// Timing metrics collected during a single step.
///
/// All durations are in microseconds. [`step`](crate::step) populates
/// these fields; the [`Simulation`](crate::Simulation) driver keeps the
/// most recent set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent pushing every kinetic species, in microseconds.
    pub push_us: u64,
    /// Time spent depositing charge, in microseconds.
    pub deposit_us: u64,
    /// Time spent in the Poisson solve, in microseconds.
    pub solve_us: u64,
    /// Time spent deriving the field from the potential, in microseconds.
    pub field_us: u64,
    /// Particles pushed this step.
    pub particles_pushed: usize,
}

impl StepMetrics {
    /// Fold another step's metrics into a running total.
    pub fn accumulate(&mut self, other: &StepMetrics) {
        self.total_us += other.total_us;
        self.push_us += other.push_us;
        self.deposit_us += other.deposit_us;
        self.solve_us += other.solve_us;
        self.field_us += other.field_us;
        self.particles_pushed += other.particles_pushed;
    }
}
