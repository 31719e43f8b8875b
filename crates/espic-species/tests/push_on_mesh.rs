//! Species against a real grid and against mock fields.

use espic_core::ElectricField;
use espic_species::{
    Distribution, Initializer, Particles, RejectionSampler, Species, SpeciesError, Velocity,
};
use espic_test_utils::fixtures::{ramp_field_mesh, reference_mesh};
use espic_test_utils::strategies::{charge, positions};
use espic_test_utils::{assert_close, nan_field, uniform_field, MockField};
use proptest::prelude::*;

/// Places `n` particles evenly on `[0, 1)` with a fixed drift velocity.
struct Lattice {
    drift: f64,
}

impl Initializer for Lattice {
    fn initialize(&mut self, n: usize) -> Result<(Vec<f64>, Velocity), SpeciesError> {
        let x = (0..n).map(|i| i as f64 / n as f64).collect();
        Ok((x, Velocity::longitudinal(vec![self.drift; n])))
    }
}

fn lattice_species(n: usize, drift: f64) -> Species {
    let particles = Particles::sample(n, &mut Lattice { drift }).unwrap();
    Species::builder("lattice").ensemble(particles).build().unwrap()
}

#[test]
fn push_reads_the_field_twice_per_particle() {
    let mut s = lattice_species(8, 0.5);
    let field = uniform_field(0.01, 1.0);
    s.push(&field).unwrap();
    assert_eq!(field.calls(), 16);
}

#[test]
fn zero_mesh_field_is_pure_drift() {
    let mesh = reference_mesh();
    let mut s = lattice_species(4, 1.0);
    let vth = s.vth();
    s.push(&mesh).unwrap();
    let p = s.particles().unwrap();
    for (i, &x) in p.positions().iter().enumerate() {
        assert_close(x, i as f64 / 4.0 + mesh.dt() * vth, 1e-12);
    }
    assert!(p.velocities().x.iter().all(|&v| v == 1.0));
}

#[test]
fn push_samples_the_mesh_field_at_both_positions() {
    let mesh = ramp_field_mesh();
    let mut s = lattice_species(1, 0.0);
    let (q, m, vth, dt) = (s.charge(), s.mass(), s.vth(), mesh.dt());
    s.push(&mesh).unwrap();

    let mut v = 0.5 * dt * mesh.evaluate_field_at(0.0) * q / (m * vth);
    let x = dt * v * vth;
    v += 0.5 * dt * mesh.evaluate_field_at(x) * q / (m * vth);
    let p = s.particles().unwrap();
    assert_eq!(p.positions()[0], x);
    assert_eq!(p.velocities().x[0], v);
}

#[test]
fn transverse_velocities_are_untouched() {
    let v = Velocity {
        x: vec![0.2, -0.3],
        y: vec![1.0, 2.0],
        z: vec![3.0, 4.0],
    };
    let mut s = Species::builder("s")
        .ensemble(Particles::new(vec![0.25, 0.75], v).unwrap())
        .build()
        .unwrap();
    s.push(&uniform_field(0.05, 3.0)).unwrap();
    let v = s.particles().unwrap().velocities();
    assert_eq!(v.y, vec![1.0, 2.0]);
    assert_eq!(v.z, vec![3.0, 4.0]);
}

#[test]
fn nan_field_stops_the_push() {
    let mut s = lattice_species(3, 0.0);
    assert_eq!(
        s.push(&nan_field(0.01)),
        Err(SpeciesError::NonFiniteParticle { index: 0 })
    );
}

#[test]
fn sampled_species_deposits_its_charge() {
    let sampler = RejectionSampler::builder()
        .distribution(Distribution::Maxwellian)
        .seed(5)
        .build()
        .unwrap();
    let s = Species::builder("electrons")
        .charge(-1.0)
        .particles(200)
        .sampler(sampler)
        .build()
        .unwrap();
    let mut mesh = reference_mesh();
    mesh.deposit([&s]).unwrap();
    assert_close(mesh.total_charge(), -1.0, 1e-12);
}

#[test]
fn initial_conditions_in_bounds() {
    let s = Species::builder("default").build().unwrap();
    let p = s.particles().unwrap();
    for i in 0..s.len() {
        assert!((0.0..=1.0).contains(&p.positions()[i]));
        assert!((-6.0..=6.0).contains(&p.velocities().x[i]));
        assert_eq!(p.velocities().y[i], 0.0);
        assert_eq!(p.velocities().z[i], 0.0);
    }
}

proptest! {
    #[test]
    fn positions_stay_in_unit_interval(
        xs in positions(32),
        drift in -50.0f64..50.0,
        e in -100.0f64..100.0,
        q in charge(),
    ) {
        let n = xs.len();
        let mut s = Species::builder("p")
            .charge(q)
            .ensemble(Particles::new(xs, Velocity::longitudinal(vec![drift; n])).unwrap())
            .build()
            .unwrap();
        let field = MockField::new(0.01, move |x: f64| e * (2.0 * std::f64::consts::PI * x).sin());
        for _ in 0..20 {
            s.push(&field).unwrap();
            for &x in s.particles().unwrap().positions() {
                prop_assert!((0.0..1.0).contains(&x), "x = {}", x);
            }
        }
    }

    #[test]
    fn uniform_field_kick_is_linear_in_charge(q in charge(), e in -10.0f64..10.0) {
        let mut s = Species::builder("p")
            .charge(q)
            .ensemble(Particles::new(vec![0.5], Velocity::zeros(1)).unwrap())
            .build()
            .unwrap();
        let field = uniform_field(0.01, e);
        s.push(&field).unwrap();
        let expected = 2.0 * (0.5 * field.dt() * e * q / (s.mass() * s.vth()));
        prop_assert!((s.particles().unwrap().velocities().x[0] - expected).abs() < 1e-12);
    }
}
