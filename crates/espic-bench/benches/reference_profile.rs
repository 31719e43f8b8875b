//! Criterion benchmarks for the full stepping protocol.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use espic_bench::{build, reference_profile, stress_profile, two_stream_profile};
use espic_engine::step;

fn bench_step_100k(c: &mut Criterion) {
    let (mut mesh, mut plasma) = build(&reference_profile(42));

    // Warm up: one step so the field is populated
    step(&mut mesh, &mut plasma).unwrap();

    c.bench_function("step_100k", |b| {
        b.iter(|| {
            let metrics = step(&mut mesh, &mut plasma).unwrap();
            black_box(&metrics);
        });
    });
}

fn bench_step_1m(c: &mut Criterion) {
    let (mut mesh, mut plasma) = build(&stress_profile(42));
    step(&mut mesh, &mut plasma).unwrap();

    c.bench_function("step_1m", |b| {
        b.iter(|| {
            let metrics = step(&mut mesh, &mut plasma).unwrap();
            black_box(&metrics);
        });
    });
}

fn bench_100_steps_two_stream(c: &mut Criterion) {
    let config = two_stream_profile(42);
    c.bench_function("100_steps_two_stream", |b| {
        b.iter_batched(
            || build(&config),
            |(mut mesh, mut plasma)| {
                for _ in 0..100 {
                    black_box(step(&mut mesh, &mut plasma).unwrap());
                }
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_step_100k,
    bench_step_1m,
    bench_100_steps_two_stream
);
criterion_main!(benches);
