//! Plasma species for the espic particle-in-cell kernel.
//!
//! A [`Species`] is either kinetic, owning a [`Particles`] ensemble that
//! is advanced by the leapfrog [`Species::push`], or adiabatic, standing
//! in as a constant charge background. Both implement
//! [`ChargeSource`](espic_core::ChargeSource) so the grid can deposit
//! them, and the push reads the field through
//! [`ElectricField`](espic_core::ElectricField), so this crate never
//! depends on the grid.
//!
//! Initial conditions come from an [`Initializer`]; the provided
//! [`RejectionSampler`] draws from a [`Distribution`] with a seeded
//! `ChaCha8Rng`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod particles;
pub mod sampling;
pub mod species;

pub use error::SpeciesError;
pub use particles::{Particles, Velocity};
pub use sampling::{Distribution, Initializer, RejectionSampler, RejectionSamplerBuilder};
pub use species::{Model, Species, SpeciesBuilder};
