//! Local listener: plays audio frames on the sound card and prints control
//! updates to stdout.

use rtrb::Producer;
use saavy_cast::{
    broadcast::{Connection, ConnectionId, Frame, SendError},
    graph::SampleBuffer,
};
use tracing::{trace, warn};

pub struct ConsoleConnection {
    id: ConnectionId,
    audio: Option<Producer<f32>>,
    overruns: u64,
}

impl ConsoleConnection {
    pub fn new(audio: Option<Producer<f32>>) -> Self {
        Self {
            id: ConnectionId::next(),
            audio,
            overruns: 0,
        }
    }
}

impl Connection for ConsoleConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send(&mut self, frame: Frame) -> Result<(), SendError> {
        match frame {
            Frame::Text(text) => {
                println!("{text}");
                Ok(())
            }
            Frame::Binary(bytes) => {
                let Some(audio) = self.audio.as_mut() else {
                    return Ok(());
                };
                let block = match SampleBuffer::from_le_bytes(&bytes) {
                    Ok(block) => block,
                    Err(err) => {
                        warn!(%err, "skipping malformed audio frame");
                        return Ok(());
                    }
                };

                // Device fell behind: drop the block rather than block the engine.
                if audio.slots() < block.as_slice().len() {
                    self.overruns += 1;
                    trace!(overruns = self.overruns, "audio ring full, block dropped");
                    return Err(SendError::Full);
                }
                for &sample in block.as_slice() {
                    let _ = audio.push(sample);
                }
                Ok(())
            }
        }
    }
}
