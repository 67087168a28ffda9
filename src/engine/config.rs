use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    dsp::envelope::AdsrParams,
    graph::control::DEFAULT_CHANNEL_CAPACITY,
    sequencing::{Pattern, DEFAULT_NOTE, STEPS},
};

/// Everything needed to build the patch. Every section and field is
/// optional in TOML; missing values keep their defaults.
///
/// ```toml
/// [oscillator]
/// vco_frequency = 220.0
///
/// [envelope]
/// attack_ms = 5.0
///
/// [sequencer]
/// bpm = 90.0
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub oscillator: OscillatorConfig,
    pub envelope: AdsrParams,
    pub sequencer: SequencerConfig,
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OscillatorConfig {
    pub vco_frequency: f64,
    pub lfo_frequency: f64,
    /// Hz of VCO deviation per unit of LFO
    pub depth: f64,
    /// Static VCA gain
    pub gain: f32,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            vco_frequency: 1000.0,
            lfo_frequency: 0.5,
            depth: 0.0,
            gain: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequencerConfig {
    pub bpm: f64,
    /// Start the sequencer as soon as the engine runs
    pub autostart: bool,
    pub gates: [bool; STEPS],
    pub notes: [u8; STEPS],
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            autostart: true,
            gates: [false; STEPS],
            notes: [DEFAULT_NOTE; STEPS],
        }
    }
}

impl SequencerConfig {
    pub fn pattern(&self) -> Pattern {
        Pattern::from_parts(self.gates, self.notes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// Capacity of each control channel, in blocks
    pub channel_capacity: usize,
    /// How many blocks the engine may fall behind before it stops catching
    /// up and resynchronizes to the clock
    pub max_lag_buffers: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_lag_buffers: 8,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}
