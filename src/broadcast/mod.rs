//! Listener connections and the fan-out sink.
//!
//! The engine never touches sockets. Transports register listeners as
//! [`Connection`]s and report activity as [`TransportEvent`]s; the
//! [`BroadcastSink`] copies every audio frame to every registered listener.

pub mod connection;
pub mod sink;
pub mod transport;

pub use connection::{Connection, ConnectionId, Frame, SendError};
pub use sink::BroadcastSink;
pub use transport::{ChannelConnection, TransportEvent, DEFAULT_LISTENER_QUEUE};
