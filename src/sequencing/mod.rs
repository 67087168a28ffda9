pub mod pattern;
pub mod step_sequencer;

pub use pattern::{Pattern, Step, DEFAULT_NOTE, STEPS};
pub use step_sequencer::{StepEvent, StepSequencer};

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn note_to_frequency(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((note as f64 - 69.0) / 12.0)
}
