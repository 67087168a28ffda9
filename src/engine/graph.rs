use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::{
    broadcast::{BroadcastSink, Connection, ConnectionId, Frame, TransportEvent},
    control::{ControlMessage, InitSnapshot},
    engine::config::EngineConfig,
    graph::{EnvelopeGenerator, FrameEncoder, GainStage, Oscillator, Processor, Source},
    sequencing::{note_to_frequency, StepEvent, StepSequencer},
};

/*
The Patch
=========

One owned object holds every node. Nothing is shared, so every parameter
change happens between two render cycles:

    LFO ──cv──→ VCO ──→ VCA ──→ encoder ──→ sink ──→ listeners
                         ↑
    Env ─────────cv──────┘
     ↑
    sequencer (gate on: retune VCO, trigger Env)

One render cycle moves exactly one block through each chain:

    1. LFO block  → VCO cv input
    2. Env block  → VCA cv input
    3. VCO block  → VCA → encoder → sink
*/

pub struct SynthGraph {
    lfo: Oscillator,
    vco: Oscillator,
    env: EnvelopeGenerator,
    vca: GainStage,
    encoder: FrameEncoder,
    sink: BroadcastSink,
    sequencer: StepSequencer,
}

impl SynthGraph {
    pub fn new(config: &EngineConfig, now: Instant) -> Self {
        let capacity = config.stream.channel_capacity;
        let osc = &config.oscillator;

        let mut sequencer = StepSequencer::new(config.sequencer.bpm, now)
            .with_pattern(config.sequencer.pattern());
        if config.sequencer.autostart {
            sequencer.start();
        }

        Self {
            lfo: Oscillator::new(osc.lfo_frequency).with_cv_capacity(capacity),
            vco: Oscillator::new(osc.vco_frequency)
                .with_depth(osc.depth)
                .with_cv_capacity(capacity),
            env: EnvelopeGenerator::new(config.envelope),
            vca: GainStage::new(osc.gain).with_cv_capacity(capacity),
            encoder: FrameEncoder::new(),
            sink: BroadcastSink::new(),
            sequencer,
        }
    }

    /// Move one block through both chains and out to the listeners.
    /// Returns how many listeners received the frame.
    pub fn render_cycle(&mut self) -> usize {
        if let Some(lfo) = self.lfo.produce_next() {
            self.vco.cv_in().write(lfo);
        }
        if let Some(env) = self.env.produce_next() {
            self.vca.cv_in().write(env);
        }

        let Some(block) = self.vco.produce_next() else {
            return 0;
        };
        let block = self.vca.process(block);

        match self.encoder.encode(block.to_le_bytes()) {
            Ok(frame) => self.sink.broadcast(&frame),
            Err(err) => {
                warn!(%err, "dropping malformed frame");
                0
            }
        }
    }

    /// Poll the sequencer and act on a step if one fired.
    pub fn tick_sequencer(&mut self, now: Instant) -> Option<StepEvent> {
        let event = self.sequencer.tick(now)?;
        self.on_step(event);
        Some(event)
    }

    /// Sequencer callback: an open gate retunes the VCO and fires the envelope.
    pub fn on_step(&mut self, event: StepEvent) {
        if event.gate {
            self.vco.set_frequency(note_to_frequency(event.note));
            self.env.trigger();
        }
    }

    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected(conn) => {
                self.connect(conn);
            }
            TransportEvent::Message { from, text } => self.handle_text(from, &text),
            TransportEvent::Binary { from, bytes } => {
                trace!(%from, len = bytes.len(), "ignoring inbound binary frame");
            }
            TransportEvent::Closed(id) => {
                self.sink.remove(id);
            }
        }
    }

    /// Register a listener and send it the current state.
    pub fn connect(&mut self, conn: Box<dyn Connection>) -> ConnectionId {
        let id = self.sink.add(conn);
        match self.snapshot().to_json() {
            Ok(init) => {
                if let Err(err) = self.sink.send_to(id, Frame::Text(init)) {
                    warn!(%id, %err, "init snapshot not delivered");
                }
            }
            Err(err) => warn!(%id, %err, "failed to encode init snapshot"),
        }
        id
    }

    pub fn disconnect(&mut self, id: ConnectionId) {
        self.sink.remove(id);
    }

    /// Apply a text control frame and mirror it to the other listeners.
    /// Frames that don't parse are logged and dropped.
    pub fn handle_text(&mut self, from: ConnectionId, text: &str) {
        let message = match ControlMessage::parse(text) {
            Ok(message) => message,
            Err(err) => {
                warn!(%from, %err, "dropping control message");
                return;
            }
        };

        debug!(%from, ?message, "control message");
        self.apply(&message);
        self.sink.send_message(text, Some(from));
    }

    /// Apply one control message to the patch.
    pub fn apply(&mut self, message: &ControlMessage) {
        match *message {
            ControlMessage::Freq(hz) => self.vco.set_frequency(hz),
            ControlMessage::Lfo(hz) => self.lfo.set_frequency(hz),
            ControlMessage::Depth(depth) => self.vco.set_depth(depth),
            ControlMessage::Attack(ms) => self.env.update(|p| p.attack_ms = ms),
            ControlMessage::Decay(ms) => self.env.update(|p| p.decay_ms = ms),
            ControlMessage::Sustain(level) => self.env.update(|p| p.sustain_level = level),
            ControlMessage::SustainTime(ms) => self.env.update(|p| p.sustain_ms = ms),
            ControlMessage::Release(ms) => self.env.update(|p| p.release_ms = ms),
            ControlMessage::Trigger { frequency } => {
                if let Some(hz) = frequency {
                    self.vco.set_frequency(hz);
                }
                self.env.trigger();
            }
            ControlMessage::Seq { gate, note } => {
                let pattern = self.sequencer.pattern_mut();
                if let Some(edit) = gate {
                    if !pattern.set_gate(edit.index, edit.value) {
                        debug!(index = edit.index, "gate index out of range");
                    }
                }
                if let Some(edit) = note {
                    if !pattern.set_note(edit.index, edit.value) {
                        debug!(index = edit.index, "note index out of range");
                    }
                }
            }
            ControlMessage::SeqOnOff(true) => self.sequencer.start(),
            ControlMessage::SeqOnOff(false) => self.sequencer.stop(),
            ControlMessage::Bpm(bpm) => {
                if !self.sequencer.set_bpm(bpm) {
                    debug!(bpm, "ignoring invalid bpm");
                }
            }
            ControlMessage::Ignored(ref kind) => {
                trace!(kind = kind.as_str(), "ignored control message");
            }
        }
    }

    pub fn snapshot(&self) -> InitSnapshot {
        let env = self.env.params();
        let pattern = self.sequencer.pattern();

        InitSnapshot {
            freq: self.vco.frequency(),
            lfo: self.lfo.frequency(),
            depth: self.vco.depth(),
            attack: env.attack_ms,
            decay: env.decay_ms,
            sustain: env.sustain_level,
            sustain_time: env.sustain_ms,
            release: env.release_ms,
            seqonoff: self.sequencer.is_running(),
            bpm: self.sequencer.bpm(),
            gate: pattern.gates(),
            note: pattern.notes(),
        }
    }

    pub fn vco(&self) -> &Oscillator {
        &self.vco
    }

    pub fn lfo(&self) -> &Oscillator {
        &self.lfo
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.env
    }

    pub fn vca(&self) -> &GainStage {
        &self.vca
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut StepSequencer {
        &mut self.sequencer
    }

    pub fn sink(&self) -> &BroadcastSink {
        &self.sink
    }
}
