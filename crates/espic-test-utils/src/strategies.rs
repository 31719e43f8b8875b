//! Proptest strategies for particle data.

use proptest::collection::vec;
use proptest::prelude::*;

/// A single position in `[0, 1)`.
pub fn position() -> impl Strategy<Value = f64> {
    0.0f64..1.0
}

/// Between 1 and `max` positions in `[0, 1)`.
pub fn positions(max: usize) -> impl Strategy<Value = Vec<f64>> {
    vec(position(), 1..=max)
}

/// A species charge bounded away from zero, either sign.
pub fn charge() -> impl Strategy<Value = f64> {
    prop_oneof![-4.0f64..-0.1, 0.1f64..4.0]
}

/// A periodic interval count small enough for fast tests.
pub fn intervals() -> impl Strategy<Value = usize> {
    2usize..128
}
