//! Low-level DSP primitives used by the graph nodes.
//!
//! These are allocation-free and operate one sample (or one slice) at a
//! time. The graph layer adds block framing, control inputs and parameter
//! handling on top.

/// Gain × control multiplication.
pub mod amplify;
/// Self-running ADSR envelope with a timed sustain hold.
pub mod envelope;
/// Sine phase accumulator.
pub mod oscillator;

pub use envelope::{AdsrParams, EnvelopeStage};
