//! Sine phase accumulator with per-sample frequency modulation.

/*
Phase Stepping
==============

A sine oscillator keeps a running phase measured in cycles (1.0 = one full
period). Each sample we emit sin(2π · phase) and then step the phase forward.

Vocabulary
----------

  phase       Position in the waveform in cycles. Starts at 0.0.

  increment   How far the phase advances per sample:

                  increment = (frequency + cv × depth) / sample_rate

  cv          Control value read from the modulation input for that sample.
              0.0 when nothing is queued.

  depth       Scales cv into Hz. depth = 0 disables modulation entirely.


Unwrapped Phase
---------------

The phase is never reduced modulo 1.0. sin() doesn't care, and this keeps the
output identical to the long-standing behaviour of the engine. The catch is
precision: an f64 holds ~15-16 significant digits, so after a few hours at
audio rates the fractional part of the phase starts losing resolution. The
phase is kept in f64 to push that point far out; wrapping would change the
long-run float behaviour and needs a product decision first.
*/

use std::f64::consts::TAU;

/// Per-sample phase increment for a modulated frequency.
#[inline]
pub fn phase_increment(frequency: f64, cv: f64, depth: f64, sample_rate: f64) -> f64 {
    (frequency + cv * depth) / sample_rate
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SinePhase {
    phase: f64,
}

impl SinePhase {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Emit the sample at the current phase, then advance by `increment`.
    #[inline]
    pub fn next(&mut self, increment: f64) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase += increment;
        value as f32
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}
