use crate::{
    dsp::envelope::{AdsrParams, Envelope, EnvelopeStage},
    graph::{buffer::SampleBuffer, node::Source},
    SAMPLE_RATE,
};

/// Envelope generator node.
///
/// A self-clocked source: it has no CV input and emits its level as a
/// control block every cycle, which the graph writes into the VCA's CV
/// input. Triggered by the sequencer or a `trigger` control message.
pub struct EnvelopeGenerator {
    env: Envelope,
}

impl EnvelopeGenerator {
    pub fn new(params: AdsrParams) -> Self {
        Self {
            env: Envelope::new(SAMPLE_RATE, params),
        }
    }

    pub fn trigger(&mut self) {
        self.env.trigger();
    }

    pub fn params(&self) -> AdsrParams {
        self.env.params()
    }

    /// Replace the shape. Takes effect from the next produced block.
    pub fn set_params(&mut self, params: AdsrParams) {
        self.env.set_params(params);
    }

    /// Edit one or more fields of the current shape.
    pub fn update(&mut self, edit: impl FnOnce(&mut AdsrParams)) {
        let mut params = self.env.params();
        edit(&mut params);
        self.env.set_params(params);
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.env.stage()
    }

    pub fn level(&self) -> f64 {
        self.env.level()
    }
}

impl Source for EnvelopeGenerator {
    fn produce_next(&mut self) -> Option<SampleBuffer> {
        let mut block = SampleBuffer::silent();
        self.env.render(block.as_mut_slice());
        Some(block)
    }
}
