use serde_json::{Map, Value};

use super::ControlError;

/// Step edit carried by a `seq` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateEdit {
    pub index: usize,
    pub value: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEdit {
    pub index: usize,
    pub value: i64,
}

/// A parsed inbound control message.
///
/// Fields are validated one at a time: a field with the wrong type is
/// dropped without discarding the rest of the message.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// VCO frequency, Hz
    Freq(f64),
    /// LFO frequency, Hz
    Lfo(f64),
    /// VCO modulation depth, Hz per unit of LFO
    Depth(f64),
    Attack(f64),
    Decay(f64),
    Sustain(f64),
    SustainTime(f64),
    Release(f64),
    /// Retrigger the envelope, optionally retuning the VCO first
    Trigger { frequency: Option<f64> },
    Seq {
        gate: Option<GateEdit>,
        note: Option<NoteEdit>,
    },
    /// Start (true) or stop (false) the sequencer
    SeqOnOff(bool),
    Bpm(f64),
    /// Unknown kind, or a known kind without a usable value
    Ignored(String),
}

impl ControlMessage {
    /// Parse one text frame: `{"message": <kind>, "value": ...}`.
    pub fn parse(text: &str) -> Result<Self, ControlError> {
        let value: Value = serde_json::from_str(text).map_err(ControlError::Parse)?;
        let object = value.as_object().ok_or(ControlError::NotAnObject)?;
        Self::from_object(object)
    }

    pub fn from_object(object: &Map<String, Value>) -> Result<Self, ControlError> {
        let kind = object
            .get("message")
            .and_then(Value::as_str)
            .ok_or(ControlError::MissingKind)?;
        let value = object.get("value");
        let number = value.and_then(as_number);

        let message = match kind {
            "freq" => number.map(ControlMessage::Freq),
            "lfo" => number.map(ControlMessage::Lfo),
            "depth" => number.map(ControlMessage::Depth),
            "attack" => number.map(ControlMessage::Attack),
            "decay" => number.map(ControlMessage::Decay),
            "sustain" => number.map(ControlMessage::Sustain),
            "sustainTime" => number.map(ControlMessage::SustainTime),
            "release" => number.map(ControlMessage::Release),
            "trigger" => Some(ControlMessage::Trigger { frequency: number }),
            "seq" => Some(ControlMessage::Seq {
                gate: object.get("gate").and_then(parse_gate),
                note: object.get("note").and_then(parse_note),
            }),
            "seqonoff" => Some(ControlMessage::SeqOnOff(value.is_some_and(truthy))),
            "bpm" => number.map(ControlMessage::Bpm),
            _ => None,
        };

        Ok(message.unwrap_or_else(|| ControlMessage::Ignored(kind.to_owned())))
    }
}

fn as_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn as_index(value: &Value) -> Option<usize> {
    match value.as_u64() {
        Some(index) => usize::try_from(index).ok(),
        None => value
            .as_f64()
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as usize),
    }
}

/// Loose truthiness: false, null, 0 and "" are off, anything else is on.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_gate(edit: &Value) -> Option<GateEdit> {
    let index = edit.get("index").and_then(as_index)?;
    let value = edit.get("value").is_some_and(truthy);
    Some(GateEdit { index, value })
}

fn parse_note(edit: &Value) -> Option<NoteEdit> {
    let index = edit.get("index").and_then(as_index)?;
    let value = edit.get("value").and_then(as_number)?.round() as i64;
    Some(NoteEdit { index, value })
}
