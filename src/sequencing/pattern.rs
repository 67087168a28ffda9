/// Steps per pattern.
pub const STEPS: usize = 16;
/// Note every step starts on (C3).
pub const DEFAULT_NOTE: u8 = 48;

/// One sequencer step: fire or not, and which MIDI note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub gate: bool,
    pub note: u8,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            gate: false,
            note: DEFAULT_NOTE,
        }
    }
}

/// A 16-step gate/note pattern.
///
/// Edits with an index outside 0..16 are ignored; notes are clamped to the
/// MIDI range 0..=127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pattern {
    steps: [Step; STEPS],
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(gates: [bool; STEPS], notes: [u8; STEPS]) -> Self {
        let mut pattern = Self::new();
        for (i, step) in pattern.steps.iter_mut().enumerate() {
            step.gate = gates[i];
            step.note = notes[i].min(127);
        }
        pattern
    }

    pub fn step(&self, index: usize) -> Option<Step> {
        self.steps.get(index).copied()
    }

    /// Returns false if the index is out of range.
    pub fn set_gate(&mut self, index: usize, gate: bool) -> bool {
        match self.steps.get_mut(index) {
            Some(step) => {
                step.gate = gate;
                true
            }
            None => false,
        }
    }

    /// Returns false if the index is out of range.
    pub fn set_note(&mut self, index: usize, note: i64) -> bool {
        match self.steps.get_mut(index) {
            Some(step) => {
                step.note = note.clamp(0, 127) as u8;
                true
            }
            None => false,
        }
    }

    /// Gates as 0/1, the form listeners expect.
    pub fn gates(&self) -> [u8; STEPS] {
        self.steps.map(|s| s.gate as u8)
    }

    pub fn notes(&self) -> [u8; STEPS] {
        self.steps.map(|s| s.note)
    }
}
