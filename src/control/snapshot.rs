use serde::Serialize;

use crate::sequencing::STEPS;

/// Current state sent to a listener when it connects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitSnapshot {
    pub freq: f64,
    pub lfo: f64,
    pub depth: f64,
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    #[serde(rename = "sustainTime")]
    pub sustain_time: f64,
    pub release: f64,
    pub seqonoff: bool,
    pub bpm: f64,
    pub gate: [u8; STEPS],
    pub note: [u8; STEPS],
}

#[derive(Serialize)]
struct InitMessage<'a> {
    message: &'static str,
    data: &'a InitSnapshot,
}

impl InitSnapshot {
    /// `{"message":"init","data":{...}}`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&InitMessage {
            message: "init",
            data: self,
        })
    }
}
