//! Addresses advertised by peers.

use std::collections::HashMap;

use gnsp_types::{AbsoluteTime, PeerId};

/// One advertised endpoint of a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddress {
    /// Transport name, e.g. `"udp"`.
    pub transport: String,
    /// Transport-specific address bytes.
    pub address: Vec<u8>,
    /// When the advertisement stops being valid.
    pub expiration: AbsoluteTime,
}

impl PeerAddress {
    /// Creates an address advertisement.
    pub fn new(transport: impl Into<String>, address: Vec<u8>, expiration: AbsoluteTime) -> Self {
        PeerAddress {
            transport: transport.into(),
            address,
            expiration,
        }
    }
}

/// The addresses currently known per peer.
#[derive(Debug, Default)]
pub struct AddressList {
    entries: HashMap<PeerId, Vec<PeerAddress>>,
}

impl AddressList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an address for a peer. A re-advertisement of the same
    /// endpoint replaces the stored expiration.
    pub fn add(&mut self, peer: PeerId, address: PeerAddress) {
        let addresses = self.entries.entry(peer).or_default();
        if let Some(existing) = addresses
            .iter_mut()
            .find(|a| a.transport == address.transport && a.address == address.address)
        {
            existing.expiration = existing.expiration.max(address.expiration);
        } else {
            addresses.push(address);
        }
    }

    /// The known addresses of a peer.
    pub fn addresses(&self, peer: &PeerId) -> &[PeerAddress] {
        self.entries.get(peer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over the peers with at least one address.
    pub fn peers(&self) -> impl Iterator<Item = &PeerId> {
        self.entries.keys()
    }

    /// Forgets a peer entirely.
    pub fn remove_peer(&mut self, peer: &PeerId) {
        self.entries.remove(peer);
    }

    /// Drops every expired advertisement.
    pub fn prune_expired(&mut self) {
        self.entries.retain(|_, addresses| {
            addresses.retain(|a| !a.expiration.is_expired());
            !addresses.is_empty()
        });
    }

    /// Number of peers with at least one address.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no peer is known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
