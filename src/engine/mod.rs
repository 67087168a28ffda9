//! Engine runtime: owns the patch and drives it in real time.
//!
//! Everything runs on one task. `tokio::select!` interleaves three things:
//! the pacer deadline (render one block), a 1 ms sequencer tick, and inbound
//! transport events. Each branch runs to completion before the next one is
//! picked, so no node ever sees another mid-block.
//!
//! # Example
//!
//! ```ignore
//! use saavy_cast::{broadcast::ChannelConnection, engine::{Engine, EngineConfig}};
//!
//! let (events_tx, events_rx) = tokio::sync::mpsc::channel(64);
//! let (conn, frames) = ChannelConnection::new(128);
//! events_tx.send(TransportEvent::Connected(Box::new(conn))).await?;
//! Engine::new(EngineConfig::default()).run(events_rx).await;
//! ```

pub mod config;
pub mod graph;
pub mod pacer;

use std::time::{Duration, Instant};

use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    broadcast::TransportEvent,
    graph::block_duration,
};

pub use config::{ConfigError, EngineConfig, OscillatorConfig, SequencerConfig, StreamConfig};
pub use graph::SynthGraph;
pub use pacer::Pacer;

/// Sequencer timer resolution.
pub const SEQUENCER_TICK: Duration = Duration::from_millis(1);

pub struct Engine {
    graph: SynthGraph,
    max_lag: u32,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            graph: SynthGraph::new(&config, Instant::now()),
            max_lag: config.stream.max_lag_buffers,
        }
    }

    pub fn graph(&self) -> &SynthGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SynthGraph {
        &mut self.graph
    }

    /// Render and broadcast forever.
    ///
    /// Audio keeps flowing after the event channel closes; the future only
    /// ends when it is dropped.
    pub async fn run(mut self, mut events: mpsc::Receiver<TransportEvent>) {
        let mut pacer = Pacer::new(block_duration(), Instant::now(), self.max_lag);
        let mut sequencer_tick = time::interval(SEQUENCER_TICK);
        sequencer_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events_open = true;

        info!(
            period_us = pacer.period().as_micros() as u64,
            "engine running"
        );

        loop {
            let deadline = time::Instant::from_std(pacer.next_deadline());

            tokio::select! {
                _ = time::sleep_until(deadline) => {
                    self.graph.render_cycle();
                    let skipped = pacer.complete(Instant::now());
                    if skipped > 0 {
                        debug!(skipped, "engine fell behind, resynchronized");
                    }
                }
                _ = sequencer_tick.tick() => {
                    self.graph.tick_sequencer(Instant::now());
                }
                event = events.recv(), if events_open => match event {
                    Some(event) => self.graph.handle_event(event),
                    None => {
                        debug!("transport event channel closed");
                        events_open = false;
                    }
                },
            }
        }
    }
}
