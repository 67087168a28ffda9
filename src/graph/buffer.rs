use std::{fmt, time::Duration};

use crate::{BLOCK_SIZE, FRAME_BYTES, SAMPLE_RATE};

/// One block of audio or control samples.
///
/// Always exactly [`BLOCK_SIZE`] samples. On the wire it is the samples as
/// little-endian f32, [`FRAME_BYTES`] bytes, with no header.
#[derive(Clone, Copy, PartialEq)]
pub struct SampleBuffer {
    samples: [f32; BLOCK_SIZE],
}

/// Control blocks share the audio block shape.
pub type ControlBuffer = SampleBuffer;

impl SampleBuffer {
    pub const fn silent() -> Self {
        Self {
            samples: [0.0; BLOCK_SIZE],
        }
    }

    pub const fn filled(value: f32) -> Self {
        Self {
            samples: [value; BLOCK_SIZE],
        }
    }

    pub fn from_fn(f: impl FnMut(usize) -> f32) -> Self {
        Self {
            samples: std::array::from_fn(f),
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn samples(&self) -> &[f32; BLOCK_SIZE] {
        &self.samples
    }

    /// Encode as raw little-endian f32 bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FRAME_BYTES);
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    /// Decode a wire frame. Anything but exactly [`FRAME_BYTES`] is rejected.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != FRAME_BYTES {
            return Err(FrameError::InvalidLength {
                expected: FRAME_BYTES,
                actual: bytes.len(),
            });
        }

        let mut samples = [0.0; BLOCK_SIZE];
        for (sample, chunk) in samples.iter_mut().zip(bytes.chunks_exact(4)) {
            *sample = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(Self { samples })
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::ops::Index<usize> for SampleBuffer {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.samples[index]
    }
}

impl fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peak = self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        f.debug_struct("SampleBuffer")
            .field("len", &BLOCK_SIZE)
            .field("first", &self.samples[0])
            .field("peak", &peak)
            .finish()
    }
}

/// Real-time length of one block: 256 / 44100 s, about 5.8 ms.
pub fn block_duration() -> Duration {
    Duration::from_secs_f64(BLOCK_SIZE as f64 / SAMPLE_RATE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Frame is not exactly one block long
    InvalidLength { expected: usize, actual: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::InvalidLength { expected, actual } => {
                write!(f, "frame must be {expected} bytes, got {actual}")
            }
        }
    }
}

impl std::error::Error for FrameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_is_little_endian() {
        let mut buffer = SampleBuffer::silent();
        buffer.as_mut_slice()[0] = 1.0;
        buffer.as_mut_slice()[BLOCK_SIZE - 1] = -2.5;

        let bytes = buffer.to_le_bytes();
        assert_eq!(bytes.len(), FRAME_BYTES);
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[FRAME_BYTES - 4..], &(-2.5f32).to_le_bytes());
    }

    #[test]
    fn decode_restores_exact_values() {
        let buffer = SampleBuffer::from_fn(|i| (i as f32 * 0.37).sin() * 1e3 - 7.25);
        let decoded = SampleBuffer::from_le_bytes(&buffer.to_le_bytes()).unwrap();
        for i in 0..BLOCK_SIZE {
            assert_eq!(decoded[i].to_bits(), buffer[i].to_bits());
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let err = SampleBuffer::from_le_bytes(&[0u8; 1020]).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidLength {
                expected: 1024,
                actual: 1020
            }
        );
    }

    #[test]
    fn block_is_about_six_ms() {
        let ms = block_duration().as_secs_f64() * 1000.0;
        assert!((ms - 5.805).abs() < 0.001, "got {ms}");
    }
}
