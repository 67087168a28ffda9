//! Glue between a network transport and the engine.
//!
//! A transport (WebSocket server, TCP, a local console...) owns the actual
//! sockets. It tells the engine what happens through [`TransportEvent`]s and
//! hands it a [`Connection`] per listener. [`ChannelConnection`] is the
//! ready-made connection for transports that drain a tokio channel.

use tokio::sync::mpsc::{self, error::TrySendError};

use super::connection::{Connection, ConnectionId, Frame, SendError};

/// Default per-listener outbound queue, in frames (~0.75 s of audio).
pub const DEFAULT_LISTENER_QUEUE: usize = 128;

/// What a transport reports to the engine.
pub enum TransportEvent {
    /// A listener is ready; register it and send it the current state
    Connected(Box<dyn Connection>),
    /// A text frame arrived from a listener
    Message { from: ConnectionId, text: String },
    /// A binary frame arrived from a listener (not used by the protocol)
    Binary { from: ConnectionId, bytes: Vec<u8> },
    /// The listener went away
    Closed(ConnectionId),
}

impl std::fmt::Debug for TransportEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportEvent::Connected(conn) => write!(f, "Connected({})", conn.id()),
            TransportEvent::Message { from, text } => {
                write!(f, "Message {{ from: {from}, len: {} }}", text.len())
            }
            TransportEvent::Binary { from, bytes } => {
                write!(f, "Binary {{ from: {from}, len: {} }}", bytes.len())
            }
            TransportEvent::Closed(id) => write!(f, "Closed({id})"),
        }
    }
}

/// Connection backed by a bounded tokio channel.
///
/// The paired receiver is the transport's outbound queue for this listener.
/// A full queue drops the frame; a dropped receiver closes the connection.
pub struct ChannelConnection {
    id: ConnectionId,
    tx: mpsc::Sender<Frame>,
}

impl ChannelConnection {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let conn = Self {
            id: ConnectionId::next(),
            tx,
        };
        (conn, rx)
    }
}

impl Connection for ChannelConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn send(&mut self, frame: Frame) -> Result<(), SendError> {
        self.tx.try_send(frame).map_err(|err| match err {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}
