use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle for one listener connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One outbound message on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Audio block, raw little-endian f32
    Binary(Vec<u8>),
    /// JSON control-state update
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// Transport has gone away
    Closed,
    /// Transport queue is full, frame dropped
    Full,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Closed => write!(f, "connection closed"),
            SendError::Full => write!(f, "connection send queue full"),
        }
    }
}

impl std::error::Error for SendError {}

/// A registered listener as seen by the engine.
///
/// `send` hands the frame to the transport and returns immediately; the
/// transport delivers frames on one connection in the order they were sent.
pub trait Connection: Send {
    fn id(&self) -> ConnectionId;

    fn is_open(&self) -> bool {
        true
    }

    fn send(&mut self, frame: Frame) -> Result<(), SendError>;
}

/// Allow boxed connections to be used as connections (for dynamic dispatch)
impl Connection for Box<dyn Connection> {
    fn id(&self) -> ConnectionId {
        (**self).id()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn send(&mut self, frame: Frame) -> Result<(), SendError> {
        (**self).send(frame)
    }
}
