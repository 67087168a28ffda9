//! Benchmarks for the FM sine oscillator.

use std::hint::black_box;

use criterion::Criterion;
use saavy_cast::{
    dsp::oscillator::{phase_increment, SinePhase},
    graph::{ControlBuffer, Oscillator, Source},
    BLOCK_SIZE, SAMPLE_RATE,
};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let mut buffer = vec![0.0f32; BLOCK_SIZE];

    // Raw phase accumulator, fixed pitch
    let mut phase = SinePhase::new();
    let inc = phase_increment(440.0, 0.0, 0.0, SAMPLE_RATE);
    group.bench_function("sine_block", |b| {
        b.iter(|| {
            for sample in buffer.iter_mut() {
                *sample = phase.next(black_box(inc));
            }
        })
    });

    // Node with a CV block queued every cycle (per-sample increment)
    let mut osc = Oscillator::new(440.0).with_depth(50.0);
    let cv = ControlBuffer::from_fn(|i| (i as f32 / BLOCK_SIZE as f32) * 2.0 - 1.0);
    group.bench_function("fm_node", |b| {
        b.iter(|| {
            osc.cv_in().write(cv);
            black_box(osc.produce_next())
        })
    });

    group.finish();
}
