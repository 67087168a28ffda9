use std::{collections::HashMap, time::Duration};

use tracing::{info, trace, warn};

use super::connection::{Connection, ConnectionId, Frame, SendError};
use crate::graph::buffer::block_duration;

/*
Broadcast Sink
==============

End of the chain. Every encoded frame is copied to every registered
listener:

    encoder ──frame──→ sink ──┬──→ listener A
                              ├──→ listener B
                              └──→ listener C

Delivery is fire-and-forget. A listener whose transport is backed up loses
that frame and the loop moves on to the next one; one bad listener never
holds up the others. A listener whose transport reports closed is removed on
the next broadcast, even if no Closed event ever arrives. Order is kept per listener (the transport queue is
FIFO) but not across listeners.

The sink accepts one frame per block_duration(). The engine's pacer enforces
that, and it is the only backpressure the chain has.
*/

#[derive(Default)]
pub struct BroadcastSink {
    connections: HashMap<ConnectionId, Box<dyn Connection>>,
    frames: u64,
}

impl BroadcastSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, connection: Box<dyn Connection>) -> ConnectionId {
        let id = connection.id();
        self.connections.insert(id, connection);
        info!(%id, connections = self.connections.len(), "listener added");
        id
    }

    /// Unknown ids are a no-op.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Box<dyn Connection>> {
        let removed = self.connections.remove(&id);
        if removed.is_some() {
            info!(%id, connections = self.connections.len(), "listener removed");
        }
        removed
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Send one frame to a single listener.
    pub fn send_to(&mut self, id: ConnectionId, frame: Frame) -> Result<(), SendError> {
        match self.connections.get_mut(&id) {
            Some(conn) => conn.send(frame),
            None => Err(SendError::Closed),
        }
    }

    /// Fan an audio frame out to every open listener. Returns how many
    /// listeners took it. Listeners whose transport reports closed are
    /// dropped from the sink.
    pub fn broadcast(&mut self, frame: &[u8]) -> usize {
        self.frames += 1;
        let mut delivered = 0;

        self.connections.retain(|id, conn| {
            if !conn.is_open() {
                info!(%id, "pruning closed listener");
                return false;
            }
            match conn.send(Frame::Binary(frame.to_vec())) {
                Ok(()) => delivered += 1,
                Err(SendError::Full) => trace!(%id, "listener behind, frame dropped"),
                Err(err) => warn!(%id, %err, "audio frame not delivered"),
            }
            true
        });

        delivered
    }

    /// Send a text update to every listener except `exclude` (usually the
    /// listener that caused it).
    pub fn send_message(&mut self, text: &str, exclude: Option<ConnectionId>) -> usize {
        let mut delivered = 0;

        for (id, conn) in self.connections.iter_mut() {
            if Some(*id) == exclude || !conn.is_open() {
                continue;
            }
            match conn.send(Frame::Text(text.to_owned())) {
                Ok(()) => delivered += 1,
                Err(err) => warn!(%id, %err, "control update not delivered"),
            }
        }

        delivered
    }

    /// Frames accepted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Minimum spacing between accepted frames.
    pub fn pacing_interval() -> Duration {
        block_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::transport::ChannelConnection;

    struct Broken(ConnectionId);

    impl Connection for Broken {
        fn id(&self) -> ConnectionId {
            self.0
        }

        fn send(&mut self, _frame: Frame) -> Result<(), SendError> {
            Err(SendError::Closed)
        }
    }

    #[test]
    fn add_then_remove_leaves_nothing() {
        let mut sink = BroadcastSink::new();
        let (conn, mut rx) = ChannelConnection::new(8);
        let id = sink.add(Box::new(conn));
        assert_eq!(sink.len(), 1);

        assert!(sink.remove(id).is_some());
        assert!(sink.is_empty());

        assert_eq!(sink.broadcast(&[1, 2, 3, 4]), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn removing_unknown_is_noop() {
        let mut sink = BroadcastSink::new();
        let (conn, _rx) = ChannelConnection::new(8);
        sink.add(Box::new(conn));

        assert!(sink.remove(ConnectionId::next()).is_none());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn every_listener_gets_identical_copy() {
        let mut sink = BroadcastSink::new();
        let (a, mut rx_a) = ChannelConnection::new(8);
        let (b, mut rx_b) = ChannelConnection::new(8);
        sink.add(Box::new(a));
        sink.add(Box::new(b));

        let frame = vec![7u8; 16];
        assert_eq!(sink.broadcast(&frame), 2);
        assert_eq!(rx_a.try_recv().unwrap(), Frame::Binary(frame.clone()));
        assert_eq!(rx_b.try_recv().unwrap(), Frame::Binary(frame));
        assert_eq!(sink.frames(), 1);
    }

    #[test]
    fn failed_listener_does_not_block_others() {
        let mut sink = BroadcastSink::new();
        sink.add(Box::new(Broken(ConnectionId::next())));
        let (ok, mut rx) = ChannelConnection::new(8);
        sink.add(Box::new(ok));

        let (gone, gone_rx) = ChannelConnection::new(8);
        sink.add(Box::new(gone));
        drop(gone_rx);

        assert_eq!(sink.broadcast(&[0u8; 8]), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn closed_listeners_are_pruned_on_broadcast() {
        let mut sink = BroadcastSink::new();
        let (open, mut rx) = ChannelConnection::new(8);
        sink.add(Box::new(open));
        let (gone, gone_rx) = ChannelConnection::new(8);
        let gone_id = sink.add(Box::new(gone));
        drop(gone_rx);

        assert_eq!(sink.broadcast(&[0u8; 8]), 1);
        assert!(!sink.contains(gone_id));
        assert_eq!(sink.len(), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn message_skips_origin() {
        let mut sink = BroadcastSink::new();
        let (a, mut rx_a) = ChannelConnection::new(8);
        let (b, mut rx_b) = ChannelConnection::new(8);
        let origin = sink.add(Box::new(a));
        sink.add(Box::new(b));

        assert_eq!(sink.send_message("{\"message\":\"bpm\"}", Some(origin)), 1);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(
            rx_b.try_recv().unwrap(),
            Frame::Text("{\"message\":\"bpm\"}".into())
        );
    }

    #[test]
    fn send_to_unknown_is_closed() {
        let mut sink = BroadcastSink::new();
        assert_eq!(
            sink.send_to(ConnectionId::next(), Frame::Text("x".into())),
            Err(SendError::Closed)
        );
    }
}
