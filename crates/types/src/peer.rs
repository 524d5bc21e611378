//! Peer identities and peer signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::base32;
use crate::error::EncodingError;

/// Size of a [`PeerId`] in bytes.
pub const PEER_ID_SIZE: usize = 32;
/// Size of a [`PeerSignature`] in bytes.
pub const PEER_SIGNATURE_SIZE: usize = 64;

/// A peer's identity: its long-term Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId([u8; PEER_ID_SIZE]);

impl PeerId {
    /// The all-zero peer identity, used as the origin of an untruncated path.
    pub const ZERO: PeerId = PeerId([0u8; PEER_ID_SIZE]);

    /// Wraps a raw 32-byte public key.
    pub const fn from_bytes(bytes: [u8; PEER_ID_SIZE]) -> Self {
        PeerId(bytes)
    }

    /// Returns the raw public key bytes.
    pub fn as_bytes(&self) -> &[u8; PEER_ID_SIZE] {
        &self.0
    }

    /// True for the all-zero identity.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; PEER_ID_SIZE]
    }

    /// Parses the 52-character base32 form produced by `Display`.
    pub fn from_string(s: &str) -> Result<Self, EncodingError> {
        let mut out = [0u8; PEER_ID_SIZE];
        base32::decode_into(s, &mut out)?;
        Ok(PeerId(out))
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::ZERO
    }
}

impl AsRef<[u8]> for PeerId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base32::encode(&self.0))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = base32::encode(&self.0);
        write!(f, "PeerId({}..)", &s[..8])
    }
}

/// An EdDSA signature made with a peer's long-term private key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PeerSignature([u8; PEER_SIGNATURE_SIZE]);

impl PeerSignature {
    /// Wraps raw signature bytes.
    pub const fn from_bytes(bytes: [u8; PEER_SIGNATURE_SIZE]) -> Self {
        PeerSignature(bytes)
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; PEER_SIGNATURE_SIZE] {
        &self.0
    }
}

impl Default for PeerSignature {
    fn default() -> Self {
        PeerSignature([0u8; PEER_SIGNATURE_SIZE])
    }
}

impl AsRef<[u8]> for PeerSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PeerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = base32::encode(&self.0);
        write!(f, "PeerSignature({}..)", &s[..8])
    }
}
