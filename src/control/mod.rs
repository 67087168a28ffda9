//! Text control protocol.
//!
//! Listeners send JSON objects of the form `{"message": kind, "value": v}`
//! to change parameters. New listeners receive an `init` snapshot of the
//! current state.

use std::fmt;

pub mod message;
pub mod snapshot;

pub use message::{ControlMessage, GateEdit, NoteEdit};
pub use snapshot::InitSnapshot;

#[derive(Debug)]
pub enum ControlError {
    /// Not valid JSON
    Parse(serde_json::Error),
    /// Valid JSON but not an object
    NotAnObject,
    /// No string `message` field
    MissingKind,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Parse(e) => write!(f, "invalid control JSON: {e}"),
            ControlError::NotAnObject => write!(f, "control message is not a JSON object"),
            ControlError::MissingKind => write!(f, "control message has no \"message\" field"),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControlError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
