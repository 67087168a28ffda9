use std::time::Duration;

use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::debug;

use crate::graph::buffer::{block_duration, ControlBuffer};

/*
Control Channel
===============

Carries control blocks (CV) from one node to another, one block per render
cycle, first in first out.

    LFO ──write──→ [ ring ] ──read──→ VCO frequency modulation
    Env ──write──→ [ ring ] ──read──→ VCA amplitude

Both ends are owned by the graph and touched from the same task, so the
queue never blocks either side:

  write   Always succeeds. If the ring is full the oldest queued block is
          discarded first (drop-oldest), so a slow reader hears the most
          recent modulation instead of an ever-growing backlog.

  read    Returns the oldest block, or None. The reader substitutes 0.0.

Pacing to real time is not done per write; the engine's pacer advances the
whole graph one block_duration() per cycle.
*/

pub const DEFAULT_CHANNEL_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Queued,
    /// The oldest block was discarded to make room
    ReplacedOldest,
}

pub struct ControlChannel {
    tx: Producer<ControlBuffer>,
    rx: Consumer<ControlBuffer>,
    dropped: u64,
}

impl ControlChannel {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = RingBuffer::new(capacity.max(1));
        Self { tx, rx, dropped: 0 }
    }

    /// Queue a block, evicting the oldest one if the channel is full.
    pub fn write(&mut self, buffer: ControlBuffer) -> WriteOutcome {
        let mut outcome = WriteOutcome::Queued;

        if self.tx.is_full() {
            if self.rx.pop().is_ok() {
                self.dropped += 1;
                debug!(dropped = self.dropped, "control channel full, dropped oldest block");
            }
            outcome = WriteOutcome::ReplacedOldest;
        }

        if let Err(PushError::Full(_)) = self.tx.push(buffer) {
            // Only reachable if capacity is zero, which with_capacity rules out.
            self.dropped += 1;
        }

        outcome
    }

    /// Oldest queued block, if any. Never waits.
    pub fn read(&mut self) -> Option<ControlBuffer> {
        self.rx.pop().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.slots()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tx.buffer().capacity()
    }

    /// Blocks discarded by drop-oldest since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Real-time duration of one queued block.
    pub fn buffer_duration() -> Duration {
        block_duration()
    }
}

impl Default for ControlChannel {
    fn default() -> Self {
        Self::new()
    }
}
