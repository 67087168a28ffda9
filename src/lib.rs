pub mod broadcast; // Listener connections and audio fan-out
pub mod control; // Text control protocol
pub mod dsp;
pub mod engine; // Owned graph, pacing and the run loop
pub mod graph; // Signal nodes exchanging fixed-size blocks
pub mod sequencing; // 16-step gate/note sequencer

/// Samples per block exchanged between every stage.
pub const BLOCK_SIZE: usize = 256;
/// Fixed engine sample rate in Hz.
pub const SAMPLE_RATE: f64 = 44_100.0;
/// Size of one block on the wire (little-endian f32).
pub const FRAME_BYTES: usize = BLOCK_SIZE * 4;
