use crate::graph::buffer::{FrameError, SampleBuffer};

/// Last stage before the broadcast sink.
///
/// Frames leave the engine as raw little-endian f32. The encoder checks that
/// a frame decodes as exactly one block and passes the same bytes
/// through untouched; a real codec would slot in here.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    frames: u64,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self { frames: 0 }
    }

    pub fn encode(&mut self, frame: Vec<u8>) -> Result<Vec<u8>, FrameError> {
        SampleBuffer::from_le_bytes(&frame)?;
        self.frames += 1;
        Ok(frame)
    }

    /// Frames passed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
