use crate::{
    dsp::oscillator::{phase_increment, SinePhase},
    graph::{
        buffer::SampleBuffer,
        control::ControlChannel,
        node::Source,
    },
    SAMPLE_RATE,
};

/*
Frequency-Modulated Sine Oscillator
===================================

Used twice in the patch:

  LFO   0.5 Hz, nothing patched into its CV input. Its output is written
        into the VCO's CV input every cycle.

  VCO   The audible oscillator. Each sample reads the matching LFO value and
        bends its frequency by cv × depth Hz.

    LFO ──cv──→ VCO ──→ VCA ──→ encoder ──→ listeners

Each produced block pops at most one CV block. If none is queued the CV is
0.0 for the whole block, so with depth = 0 (the default) the VCO is a plain
sine at `frequency` no matter what arrives on its CV input.

Parameter changes go through `&mut self`, so they can only land between two
blocks, never halfway through one.
*/

pub struct Oscillator {
    phase: SinePhase,
    /// Base frequency in Hz
    frequency: f64,
    /// Hz of deviation per unit of CV
    depth: f64,
    cv: ControlChannel,
}

impl Oscillator {
    pub fn new(frequency: f64) -> Self {
        Self {
            phase: SinePhase::new(),
            frequency,
            depth: 0.0,
            cv: ControlChannel::new(),
        }
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_cv_capacity(mut self, capacity: usize) -> Self {
        self.cv = ControlChannel::with_capacity(capacity);
        self
    }

    /// CV input for frequency modulation.
    pub fn cv_in(&mut self) -> &mut ControlChannel {
        &mut self.cv
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: f64) {
        self.depth = depth;
    }

    /// Unwrapped phase in cycles.
    pub fn phase(&self) -> f64 {
        self.phase.phase()
    }
}

impl Source for Oscillator {
    fn produce_next(&mut self) -> Option<SampleBuffer> {
        let cv = self.cv.read();
        let (frequency, depth) = (self.frequency, self.depth);
        let phase = &mut self.phase;

        Some(SampleBuffer::from_fn(|i| {
            let cv = cv.as_ref().map_or(0.0, |block| block[i] as f64);
            phase.next(phase_increment(frequency, cv, depth, SAMPLE_RATE))
        }))
    }
}
