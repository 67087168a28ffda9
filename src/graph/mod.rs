//! The signal nodes of the patch and the blocks they exchange.
//!
//! Every node works on fixed [`SampleBuffer`] blocks of `BLOCK_SIZE`
//! samples. Sources (`Oscillator`, `EnvelopeGenerator`) produce a block when
//! pulled; processors (`GainStage`) turn one block into one block. Control
//! signals travel between nodes through bounded [`ControlChannel`]s.

/// Fixed-size sample blocks and their wire form.
pub mod buffer;
/// Bounded FIFO of control blocks between two nodes.
pub mod control;
/// Identity frame stage in front of the broadcast sink.
pub mod encoder;
/// Envelope generator source.
pub mod envelope;
/// VCA processor.
pub mod gain;
/// Core traits shared by all nodes.
pub mod node;
/// Frequency-modulated sine source.
pub mod oscillator;

pub use buffer::{block_duration, ControlBuffer, FrameError, SampleBuffer};
pub use control::{ControlChannel, WriteOutcome, DEFAULT_CHANNEL_CAPACITY};
pub use encoder::FrameEncoder;
pub use envelope::EnvelopeGenerator;
pub use gain::GainStage;
pub use node::{Processor, Source};
pub use oscillator::Oscillator;
