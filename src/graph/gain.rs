use crate::{
    dsp::amplify::gain_modulate,
    graph::{buffer::SampleBuffer, control::ControlChannel, node::Processor},
};

/// VCA: `out[i] = in[i] × gain × cv[i]`.
///
/// Pops at most one CV block per processed block. With nothing queued the
/// CV is 0.0 and the output is silent.
pub struct GainStage {
    gain: f32,
    cv: ControlChannel,
}

impl GainStage {
    pub fn new(gain: f32) -> Self {
        Self {
            gain,
            cv: ControlChannel::new(),
        }
    }

    pub fn with_cv_capacity(mut self, capacity: usize) -> Self {
        self.cv = ControlChannel::with_capacity(capacity);
        self
    }

    /// CV input for amplitude modulation.
    pub fn cv_in(&mut self) -> &mut ControlChannel {
        &mut self.cv
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }
}

impl Processor for GainStage {
    fn process(&mut self, input: SampleBuffer) -> SampleBuffer {
        let cv = self.cv.read();
        let mut out = SampleBuffer::silent();
        gain_modulate(
            input.as_slice(),
            self.gain,
            cv.as_ref().map(SampleBuffer::as_slice),
            out.as_mut_slice(),
        );
        out
    }
}
