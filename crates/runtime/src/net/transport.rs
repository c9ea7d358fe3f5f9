//! Loopback transport.
//!
//! Envelopes are bincode-encoded on send and decoded on receive, so every
//! message the session exchanges must survive the wire format. Delivery is
//! reliable and ordered per destination.
use std::collections::{BTreeMap, VecDeque};

use crate::error::TransportError;

use super::message::{Envelope, PeerId};

#[derive(Debug, Default)]
pub struct LoopbackTransport {
    inboxes: BTreeMap<PeerId, VecDeque<Vec<u8>>>,
    bytes_sent: u64,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an inbox for `peer`. Reconnecting drops anything queued.
    pub fn connect(&mut self, peer: PeerId) {
        self.inboxes.insert(peer, VecDeque::new());
    }

    pub fn disconnect(&mut self, peer: PeerId) {
        self.inboxes.remove(&peer);
    }

    pub fn send(&mut self, to: PeerId, envelope: &Envelope) -> Result<(), TransportError> {
        let inbox = self
            .inboxes
            .get_mut(&to)
            .ok_or(TransportError::UnknownPeer(to))?;
        let bytes =
            bincode::serialize(envelope).map_err(|source| TransportError::Encode { to, source })?;
        self.bytes_sent += bytes.len() as u64;
        tracing::trace!(target: "runtime::net", %to, bytes = bytes.len(), "queued envelope");
        inbox.push_back(bytes);
        Ok(())
    }

    /// Takes every queued envelope for `peer`, in send order.
    pub fn receive(&mut self, peer: PeerId) -> Result<Vec<Envelope>, TransportError> {
        let inbox = self
            .inboxes
            .get_mut(&peer)
            .ok_or(TransportError::UnknownPeer(peer))?;
        inbox
            .drain(..)
            .map(|bytes| {
                bincode::deserialize(&bytes)
                    .map_err(|source| TransportError::Decode { to: peer, source })
            })
            .collect()
    }

    pub fn pending(&self, peer: PeerId) -> usize {
        self.inboxes.get(&peer).map_or(0, VecDeque::len)
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}
