use serde::{Deserialize, Serialize};

/*
ADSR + Hold Envelope
====================

A self-running linear envelope. Unlike a keyboard envelope there is no gate
held by the player: a trigger starts the attack and the shape plays out on
its own, holding the sustain level for a fixed time before releasing.

Vocabulary
----------

  level         Current output, 0.0 to 1.0. Feeds the gain stage.

  stage         Idle, Attack, Decay, Sustain or Release.

  sustain time  How long (ms) the sustain level is held before release
                begins automatically.


The Shape
---------

  Level
    1.0 ┐    ╱╲
        │   ╱  ╲________
    S   │  ╱            ╲
        │ ╱              ╲
    0.0 └╱────────────────╲──→ Time
        Attack Decay Sustain Release
                    (held for sustain_ms)


Per-Sample Rules
----------------

  attack    level rises by 1000 / (sample_rate · attack_ms) per sample.
            At level ≥ 1 the stage becomes Decay.

  decay     level falls by 1000 / (sample_rate · decay_ms) · sustain
            per sample. At level ≤ sustain the stage becomes Sustain.

  sustain   level = sustain. After floor(sample_rate · 0.001 · sustain_ms)
            samples the stage becomes Release.

  release   level falls by 1000 / (sample_rate · release_ms) per sample.
            At level ≤ 0 it is pinned to 0 and the stage becomes Idle.

  idle      level = 0 until the next trigger.

The decay slope is scaled by the sustain level, so a lower sustain level
gives a slower decay. With sustain = 0 the decay never moves; that's the
shape the engine has always produced.


Implementation Notes
--------------------

Every ramp steps from the current level, so a parameter edit mid-ramp only
changes the slope from the next sample on. Sustain edits apply to the
remaining hold; a new sustain level is taken as-is. The attack
treats anything within ATTACK_EPSILON of 1.0 as arrived, so summed float
error can't push the crossing a sample late. The crossing sample is pinned
to 1.0.

Trigger is valid from any stage and restarts the attack from zero.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // No trigger yet (or finished), level = 0
    Attack,  // Ramping 0 → 1
    Decay,   // Ramping 1 → sustain
    Sustain, // Holding sustain for sustain_ms
    Release, // Ramping sustain → 0
}

/// Envelope shape. Times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdsrParams {
    pub attack_ms: f64,
    pub decay_ms: f64,
    pub sustain_level: f64,
    pub sustain_ms: f64,
    pub release_ms: f64,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack_ms: 10.0,
            decay_ms: 10.0,
            sustain_level: 0.9,
            sustain_ms: 100.0,
            release_ms: 50.0,
        }
    }
}

impl AdsrParams {
    /// Clamp into a range the state machine can run with: every ramp lasts
    /// at least one sample and the sustain level stays inside [0, 1].
    pub fn sanitized(self, sample_rate: f64) -> Self {
        let min_ms = 1000.0 / sample_rate;
        Self {
            attack_ms: finite_or(self.attack_ms, min_ms).max(min_ms),
            decay_ms: finite_or(self.decay_ms, min_ms).max(min_ms),
            sustain_level: finite_or(self.sustain_level, 0.0).clamp(0.0, 1.0),
            sustain_ms: finite_or(self.sustain_ms, 0.0).max(0.0),
            release_ms: finite_or(self.release_ms, min_ms).max(min_ms),
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

const ATTACK_EPSILON: f64 = 1e-9;

pub struct Envelope {
    params: AdsrParams,
    sample_rate: f64,

    stage: EnvelopeStage,
    level: f64,

    sustain_elapsed: u64, // samples spent holding sustain
}

impl Envelope {
    pub fn new(sample_rate: f64, params: AdsrParams) -> Self {
        Self {
            params: params.sanitized(sample_rate),
            sample_rate,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            sustain_elapsed: 0,
        }
    }

    /// Restart from zero in the attack stage, whatever stage we're in.
    pub fn trigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
        self.level = 0.0;
        self.sustain_elapsed = 0;
    }

    pub fn set_params(&mut self, params: AdsrParams) {
        self.params = params.sanitized(self.sample_rate);
    }

    pub fn params(&self) -> AdsrParams {
        self.params
    }

    /// Number of samples sustain is held before release.
    pub fn sustain_hold_samples(&self) -> u64 {
        (self.sample_rate * 0.001 * self.params.sustain_ms).floor() as u64
    }

    /// Advance by one sample and return the new level.
    pub fn next_sample(&mut self) -> f64 {
        let p = self.params;

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += 1000.0 / (self.sample_rate * p.attack_ms);

                if self.level >= 1.0 - ATTACK_EPSILON {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level -= 1000.0 / (self.sample_rate * p.decay_ms) * p.sustain_level;

                if self.level <= p.sustain_level {
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = p.sustain_level;
                self.sustain_elapsed += 1;

                // Hold for at least the sample we just emitted.
                if self.sustain_elapsed >= self.sustain_hold_samples().max(1) {
                    self.sustain_elapsed = 0;
                    self.stage = EnvelopeStage::Release;
                }
            }

            EnvelopeStage::Release => {
                self.level -= 1000.0 / (self.sample_rate * p.release_ms);

                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.level
    }

    /// Render a block of levels.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample() as f32;
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeStage::Idle)
    }
}
