//! StepSequencer - wall-clock 16-step gate sequencer
//!
//! Ticked every millisecond by the engine. Each tick compares the time since
//! the last step against the step interval and, once it has passed, moves to
//! the next step and reports it.

use std::time::{Duration, Instant};

use tracing::debug;

use super::pattern::{Pattern, STEPS};

/// Emitted each time the sequencer advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub step: usize,
    pub gate: bool,
    pub note: u8,
}

pub struct StepSequencer {
    pattern: Pattern,
    /// Current step, 0..16
    step: usize,
    /// Tempo in beats per minute
    bpm: f64,
    running: bool,
    /// When the last step fired
    last_step: Instant,
}

impl StepSequencer {
    pub fn new(bpm: f64, now: Instant) -> Self {
        Self {
            pattern: Pattern::new(),
            step: 0,
            bpm: sanitize_bpm(bpm).unwrap_or(120.0),
            running: false,
            last_step: now,
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Rewind and run.
    pub fn start(&mut self) {
        self.step = 0;
        self.running = true;
    }

    /// Rewind and halt.
    pub fn stop(&mut self) {
        self.step = 0;
        self.running = false;
    }

    /// Run from the current position.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Halt, keeping the position.
    pub fn suspend(&mut self) {
        self.running = false;
    }

    /// Rewind, keeping the run state.
    pub fn reset(&mut self) {
        self.step = 0;
    }

    /// Time between steps: 6000 / bpm milliseconds (50 ms at 120 bpm).
    pub fn step_interval(&self) -> Duration {
        interval_for(self.bpm).unwrap_or(Duration::MAX)
    }

    /// Advance if a full step interval has passed since the last step.
    ///
    /// The next interval is measured from `now`, not from the ideal step
    /// time, so timer lateness accumulates as drift.
    pub fn tick(&mut self, now: Instant) -> Option<StepEvent> {
        if !self.running {
            return None;
        }

        if now.saturating_duration_since(self.last_step) <= self.step_interval() {
            return None;
        }

        self.step = (self.step + 1) % STEPS;
        self.last_step = now;

        let step = self.pattern.step(self.step).unwrap_or_default();
        debug!(step = self.step, gate = step.gate, note = step.note, "sequencer step");

        Some(StepEvent {
            step: self.step,
            gate: step.gate,
            note: step.note,
        })
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Ignored unless finite, positive and giving a representable step
    /// interval. Returns whether it was applied.
    pub fn set_bpm(&mut self, bpm: f64) -> bool {
        match sanitize_bpm(bpm) {
            Some(bpm) => {
                self.bpm = bpm;
                true
            }
            None => false,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn pattern_mut(&mut self) -> &mut Pattern {
        &mut self.pattern
    }
}

fn interval_for(bpm: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(6.0 / bpm).ok()
}

fn sanitize_bpm(bpm: f64) -> Option<f64> {
    (bpm.is_finite() && bpm > 0.0 && interval_for(bpm).is_some()).then_some(bpm)
}
