//! Deadline accumulator for real-time block pacing.

/*
Pacing
======

The engine has to emit one block every block_duration() (~5.8 ms). Sleeping
a fixed 5.8 ms after each block drifts: every wakeup is a little late and
the lateness adds up. Instead we keep the *ideal* time of the next block and
advance it by exactly one period per block:

    deadline₀ = start
    deadlineₙ₊₁ = deadlineₙ + period

and sleep only until the next deadline. A late wakeup makes the next sleep
shorter, so on average the rate is exact.

If the process stalls for longer than max_lag periods, catching up would
mean a burst of back-to-back blocks. Past that point the pacer gives up on
the missed blocks, reports how many were skipped and restarts the schedule
from now. Missed blocks are never rendered late.
*/

use std::time::{Duration, Instant};

pub struct Pacer {
    period: Duration,
    next_deadline: Instant,
    max_lag: u32,
}

impl Pacer {
    pub fn new(period: Duration, start: Instant, max_lag: u32) -> Self {
        Self {
            period,
            next_deadline: start,
            max_lag: max_lag.max(1),
        }
    }

    /// When the next block is due.
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Record that the block due at `next_deadline()` was emitted at `now`.
    /// Returns the number of periods dropped by a resync (usually 0).
    pub fn complete(&mut self, now: Instant) -> u64 {
        self.next_deadline += self.period;

        let behind = now.saturating_duration_since(self.next_deadline);
        if behind <= self.period * self.max_lag {
            return 0;
        }

        let skipped = (behind.as_nanos() / self.period.as_nanos().max(1)) as u64;
        self.next_deadline = now;
        skipped
    }
}
