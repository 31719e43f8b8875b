//! Test utilities and mock types for espic development.
//!
//! Provides mock implementations of the coupling traits
//! ([`ElectricField`], [`ChargeSource`]), reference grid fixtures and
//! proptest strategies shared by the integration tests of every crate.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod strategies;

use std::cell::Cell;

use espic_core::{ChargeContribution, ChargeSource, ElectricField};

/// Assert that two floats agree to within `tol`, with a readable message.
#[track_caller]
pub fn assert_close(got: f64, want: f64, tol: f64) {
    assert!(
        (got - want).abs() <= tol,
        "expected {want} (tolerance {tol}), got {got}"
    );
}

/// Mock implementation of [`ElectricField`].
///
/// Evaluates a closure of `x` and counts how many times it was sampled,
/// so tests can check how often a pusher reads the field.
pub struct MockField<F> {
    dt: f64,
    field: F,
    calls: Cell<usize>,
}

impl<F: Fn(f64) -> f64> MockField<F> {
    pub fn new(dt: f64, field: F) -> Self {
        Self {
            dt,
            field,
            calls: Cell::new(0),
        }
    }

    /// Number of `evaluate_field_at` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<F: Fn(f64) -> f64> ElectricField for MockField<F> {
    fn dt(&self) -> f64 {
        self.dt
    }

    fn evaluate_field_at(&self, x: f64) -> f64 {
        self.calls.set(self.calls.get() + 1);
        (self.field)(x)
    }
}

/// A spatially uniform field.
pub fn uniform_field(dt: f64, value: f64) -> MockField<impl Fn(f64) -> f64> {
    MockField::new(dt, move |_| value)
}

/// A field that is NaN everywhere, for exercising non-finite checks.
pub fn nan_field(dt: f64) -> MockField<impl Fn(f64) -> f64> {
    MockField::new(dt, |_| f64::NAN)
}

/// Mock implementation of [`ChargeSource`] backed by owned vectors.
///
/// [`uniform`](MockCloud::uniform) gives every particle weight `1/n`.
#[derive(Clone, Debug)]
pub struct MockCloud {
    pub charge: f64,
    pub positions: Vec<f64>,
    pub weights: Vec<f64>,
}

impl MockCloud {
    pub fn uniform(charge: f64, positions: Vec<f64>) -> Self {
        let n = positions.len();
        Self {
            charge,
            positions,
            weights: vec![1.0 / n as f64; n],
        }
    }

    /// Sum of `charge * weight` over every particle.
    pub fn total_charge(&self) -> f64 {
        self.weights.iter().map(|w| self.charge * w).sum()
    }
}

impl ChargeSource for MockCloud {
    fn charge_contribution(&self) -> ChargeContribution<'_> {
        ChargeContribution::Particles {
            charge: self.charge,
            positions: &self.positions,
            weights: &self.weights,
        }
    }
}

/// Mock constant background source.
#[derive(Clone, Copy, Debug)]
pub struct MockBackground(pub f64);

impl ChargeSource for MockBackground {
    fn charge_contribution(&self) -> ChargeContribution<'_> {
        ChargeContribution::Background { density: self.0 }
    }
}
