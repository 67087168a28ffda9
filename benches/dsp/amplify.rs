//! Benchmarks for the VCA gain primitive.

use std::hint::black_box;

use criterion::Criterion;
use saavy_cast::{dsp::amplify::gain_modulate, BLOCK_SIZE};

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    let signal: Vec<f32> = (0..BLOCK_SIZE)
        .map(|i| (i as f32 / BLOCK_SIZE as f32) * 2.0 - 1.0)
        .collect();
    let control: Vec<f32> = (0..BLOCK_SIZE)
        .map(|i| i as f32 / BLOCK_SIZE as f32)
        .collect();
    let mut output = vec![0.0f32; BLOCK_SIZE];

    group.bench_function("with_cv", |b| {
        b.iter(|| {
            gain_modulate(
                black_box(&signal),
                black_box(0.8),
                Some(black_box(&control)),
                &mut output,
            )
        })
    });

    // No CV queued: zero fill
    group.bench_function("no_cv", |b| {
        b.iter(|| gain_modulate(black_box(&signal), 0.8, None, &mut output))
    });

    group.finish();
}
