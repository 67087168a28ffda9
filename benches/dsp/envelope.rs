//! Benchmarks for the envelope generator.

use std::hint::black_box;

use criterion::Criterion;
use saavy_cast::{
    dsp::{envelope::Envelope, AdsrParams},
    BLOCK_SIZE, SAMPLE_RATE,
};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let mut buffer = vec![0.0f32; BLOCK_SIZE];

    // Attack phase (ramping up)
    let mut env = Envelope::new(
        SAMPLE_RATE,
        AdsrParams {
            attack_ms: 10_000.0,
            ..AdsrParams::default()
        },
    );
    env.trigger();
    group.bench_function("attack", |b| {
        b.iter(|| env.render(black_box(&mut buffer)))
    });

    // Sustain hold (counter only)
    let mut env = Envelope::new(
        SAMPLE_RATE,
        AdsrParams {
            attack_ms: 0.1,
            decay_ms: 0.1,
            sustain_ms: 1.0e9,
            ..AdsrParams::default()
        },
    );
    env.trigger();
    for _ in 0..100 {
        env.next_sample();
    }
    group.bench_function("sustain", |b| {
        b.iter(|| env.render(black_box(&mut buffer)))
    });

    // Idle (constant zero)
    let mut env = Envelope::new(SAMPLE_RATE, AdsrParams::default());
    group.bench_function("idle", |b| {
        b.iter(|| env.render(black_box(&mut buffer)))
    });

    group.finish();
}
