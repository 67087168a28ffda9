//! Benchmark for one full render cycle of the patch.

use std::{hint::black_box, time::Instant};

use criterion::Criterion;
use saavy_cast::{
    broadcast::ChannelConnection,
    control::ControlMessage,
    engine::{EngineConfig, SynthGraph},
};

pub fn bench_render_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    let mut config = EngineConfig::default();
    config.oscillator.depth = 100.0;
    config.envelope.sustain_ms = 1.0e9;

    // Silent patch, no listeners
    let mut graph = SynthGraph::new(&config, Instant::now());
    group.bench_function("render_idle", |b| b.iter(|| black_box(graph.render_cycle())));

    // Sounding voice with four listeners whose queues are drained each cycle
    let mut graph = SynthGraph::new(&config, Instant::now());
    let mut receivers: Vec<_> = (0..4)
        .map(|_| {
            let (conn, rx) = ChannelConnection::new(16);
            graph.connect(Box::new(conn));
            rx
        })
        .collect();
    graph.apply(&ControlMessage::Trigger { frequency: None });
    group.bench_function("render_4_listeners", |b| {
        b.iter(|| {
            let delivered = graph.render_cycle();
            for rx in receivers.iter_mut() {
                while rx.try_recv().is_ok() {}
            }
            black_box(delivered)
        })
    });

    group.finish();
}
