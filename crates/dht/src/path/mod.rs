//! DHT route attestation.
//!
//! Every peer that forwards a DHT request signs the transition it performed:
//! "I received this block's request from `predecessor` and handed it to
//! `successor`". The signatures chain right to left, the newest hop last.
//! [`Path::verify`] replays the chain against locally reconstructed
//! predecessor/successor context; an invalid signature never surfaces as an
//! error but truncates the path to the still-valid newer suffix, so a path
//! that leaves verification always re-verifies cleanly.

use bitflags::bitflags;

use gnsp_crypto::sign::eddsa;
use gnsp_types::error::PathError;
use gnsp_types::hash::HASH_CODE_SIZE;
use gnsp_types::peer::{PEER_ID_SIZE, PEER_SIGNATURE_SIZE};
use gnsp_types::{AbsoluteTime, HashCode, PeerId, PeerSignature};

/// Signature purpose tag for DHT hop attestations, from the protocol-wide
/// purpose enumeration.
pub const SIG_DHT_HOP: u16 = 28;

/// Value of the signed blob's size field: the bytes it covers (expiration,
/// block hash, predecessor, successor).
const SIGNED_BODY_SIZE: u16 = 0x0088;

/// Full size of the signed blob including the 4-byte size/purpose header.
pub const SIGNED_DATA_SIZE: usize = 140;

bitflags! {
    /// Route options carried in a path's flag word. The values align with
    /// the wider DHT route-option bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PathFlags: u16 {
        /// The path was truncated; its oldest predecessor is `trunc_origin`.
        const TRUNCATED = 0x02;
        /// The path records the route; `last_sig`/`last_hop` are present.
        const RECORD_ROUTE = 0x04;
    }
}

/// Serializes the fixed signed-data layout for one hop attestation.
pub fn signed_data(
    expiration: AbsoluteTime,
    block_hash: &HashCode,
    predecessor: &PeerId,
    successor: &PeerId,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(SIGNED_DATA_SIZE);
    out.extend_from_slice(&SIGNED_BODY_SIZE.to_be_bytes());
    out.extend_from_slice(&SIG_DHT_HOP.to_be_bytes());
    out.extend_from_slice(&expiration.to_be_bytes());
    out.extend_from_slice(block_hash.as_bytes());
    out.extend_from_slice(predecessor.as_bytes());
    out.extend_from_slice(successor.as_bytes());
    out
}

/// One hop attestation under construction: the signable view of a request
/// passing through `signer` on its way from `predecessor` to `successor`.
#[derive(Debug, Clone)]
pub struct PathElement {
    expiration: AbsoluteTime,
    block_hash: HashCode,
    predecessor: PeerId,
    signer: PeerId,
    successor: PeerId,
    signature: Option<PeerSignature>,
}

impl PathElement {
    /// Builds the signable element for one hop of `path`.
    pub fn new(path: &Path, predecessor: PeerId, signer: PeerId, successor: PeerId) -> Self {
        PathElement {
            expiration: path.expiration,
            block_hash: path.block_hash,
            predecessor,
            signer,
            successor,
            signature: None,
        }
    }

    /// The signed-data blob this element attests to.
    pub fn signed_data(&self) -> Vec<u8> {
        signed_data(
            self.expiration,
            &self.block_hash,
            &self.predecessor,
            &self.successor,
        )
    }

    /// Signs the element with the local peer's long-term key. The key pair
    /// must belong to this element's `signer`.
    pub fn sign(&mut self, key: &eddsa::Ed25519KeyPair) {
        self.signature = Some(PeerSignature::from_bytes(key.sign(&self.signed_data())));
    }

    /// Attaches an externally produced hop signature.
    pub fn attach_signature(&mut self, signature: PeerSignature) {
        self.signature = Some(signature);
    }

    /// The hop signature, once attached.
    pub fn signature(&self) -> Option<&PeerSignature> {
        self.signature.as_ref()
    }

    /// The peer this element attests for.
    pub fn signer(&self) -> PeerId {
        self.signer
    }

    /// The peer the request came from.
    pub fn predecessor(&self) -> PeerId {
        self.predecessor
    }

    /// The peer the request was forwarded to.
    pub fn successor(&self) -> PeerId {
        self.successor
    }
}

/// A completed entry of a recorded route: a peer and the signature that
/// peer produced for its own transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEntry {
    /// The attesting peer.
    pub signer: PeerId,
    /// That peer's hop signature.
    pub signature: PeerSignature,
}

/// The recorded route of a DHT request.
///
/// `entries` holds the completed hops, oldest first. The newest hop is kept
/// out-of-line as `last_hop`/`last_sig` until the next [`Path::add`]
/// completes it. Mutation is limited to `add` (append) and `verify`
/// (in-place truncation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    flags: PathFlags,
    block_hash: HashCode,
    expiration: AbsoluteTime,
    trunc_origin: Option<PeerId>,
    entries: Vec<PathEntry>,
    split_pos: u16,
    last_sig: Option<PeerSignature>,
    last_hop: Option<PeerId>,
}

impl Path {
    /// An empty route for a block.
    pub fn new(block_hash: HashCode, expiration: AbsoluteTime) -> Self {
        Path {
            flags: PathFlags::empty(),
            block_hash,
            expiration,
            trunc_origin: None,
            entries: Vec::new(),
            split_pos: 0,
            last_sig: None,
            last_hop: None,
        }
    }

    /// The flag word.
    pub fn flags(&self) -> PathFlags {
        self.flags
    }

    /// The block hash every hop attested to.
    pub fn block_hash(&self) -> &HashCode {
        &self.block_hash
    }

    /// The expiration every hop attested to.
    pub fn expiration(&self) -> AbsoluteTime {
        self.expiration
    }

    /// The completed entries, oldest first.
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    /// The unverified origin of a truncated path.
    pub fn trunc_origin(&self) -> Option<PeerId> {
        self.trunc_origin
    }

    /// The newest hop's peer.
    pub fn last_hop(&self) -> Option<PeerId> {
        self.last_hop
    }

    /// The newest hop's signature.
    pub fn last_sig(&self) -> Option<PeerSignature> {
        self.last_sig
    }

    /// Position of the put/get split in the recorded route.
    pub fn split_pos(&self) -> u16 {
        self.split_pos
    }

    /// Records the put/get split position.
    pub fn set_split_pos(&mut self, split_pos: u16) {
        self.split_pos = split_pos;
    }

    /// Appends a signed hop.
    ///
    /// The previously newest hop is completed into an entry carrying the
    /// new element's predecessor; the element becomes the new
    /// `last_hop`/`last_sig` pair. The very first add only populates the
    /// pair. Fails if the element was never signed.
    pub fn add(&mut self, element: &PathElement) -> Result<(), PathError> {
        let signature = element.signature().copied().ok_or(PathError::NoSignature)?;
        if let Some(previous) = self.last_sig {
            self.entries.push(PathEntry {
                signer: element.predecessor(),
                signature: previous,
            });
        }
        self.last_sig = Some(signature);
        self.last_hop = Some(element.signer());
        self.flags |= PathFlags::RECORD_ROUTE;
        Ok(())
    }

    /// Verifies the recorded route against this peer's local view.
    ///
    /// Signatures are checked newest first. The first failure decides the
    /// outcome: a bad newest hop resets the path to empty; a bad entry
    /// truncates the route to the newer, already-verified suffix and
    /// records the dropped neighbor's signer as the unverified origin.
    /// Never fails, and a second call on the result is a no-op.
    pub fn verify(&mut self, local_peer: &PeerId) {
        let (Some(mut signer), Some(mut sig)) = (self.last_hop, self.last_sig) else {
            return;
        };
        let mut successor = *local_peer;
        let count = self.entries.len();
        for position in (0..=count).rev() {
            let predecessor = match position.checked_sub(1).and_then(|i| self.entries.get(i)) {
                Some(entry) => entry.signer,
                None => self.trunc_origin.unwrap_or(PeerId::ZERO),
            };
            let data = signed_data(self.expiration, &self.block_hash, &predecessor, &successor);
            if !eddsa::verify(signer.as_bytes(), &data, sig.as_bytes()) {
                if position == count {
                    log::debug!("invalid signature on the newest hop; resetting path");
                    self.reset();
                } else {
                    self.truncate_at(position);
                }
                return;
            }
            successor = signer;
            if let Some(entry) = position.checked_sub(1).and_then(|i| self.entries.get(i)) {
                signer = entry.signer;
                sig = entry.signature;
            }
        }
    }

    /// Clears route information after the newest hop failed verification.
    fn reset(&mut self) {
        self.entries.clear();
        self.last_sig = None;
        self.last_hop = None;
        self.trunc_origin = None;
        self.flags = PathFlags::empty();
    }

    /// Drops the entry whose signature failed at `position`, everything
    /// older, and its already-verified right neighbor, whose signer becomes
    /// the unverified origin.
    fn truncate_at(&mut self, position: usize) {
        let count = self.entries.len();
        let origin_index = (position + 1).min(count.saturating_sub(1));
        let origin = self.entries.get(origin_index).map(|entry| entry.signer);
        let dropped = (position + 2).min(count);
        log::debug!("invalid signature at path entry {position}; dropping {dropped} entries");
        self.entries.drain(..dropped);
        self.trunc_origin = origin;
        self.flags |= PathFlags::TRUNCATED;
    }

    /// Serializes the wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let count = u16::try_from(self.entries.len()).unwrap_or(u16::MAX);
        let mut out = Vec::new();
        out.extend_from_slice(&self.flags.bits().to_be_bytes());
        out.extend_from_slice(self.block_hash.as_bytes());
        out.extend_from_slice(&self.expiration.to_be_bytes());
        if self.flags.contains(PathFlags::TRUNCATED) {
            let origin = self.trunc_origin.unwrap_or(PeerId::ZERO);
            out.extend_from_slice(origin.as_bytes());
        }
        out.extend_from_slice(&count.to_be_bytes());
        out.extend_from_slice(&self.split_pos.to_be_bytes());
        for entry in self.entries.iter().take(usize::from(count)) {
            out.extend_from_slice(entry.signer.as_bytes());
            out.extend_from_slice(entry.signature.as_bytes());
        }
        if self.flags.contains(PathFlags::RECORD_ROUTE) {
            let sig = self.last_sig.unwrap_or_default();
            let hop = self.last_hop.unwrap_or(PeerId::ZERO);
            out.extend_from_slice(sig.as_bytes());
            out.extend_from_slice(hop.as_bytes());
        }
        out
    }

    /// Parses the wire form. Trailing bytes are permitted; embedding
    /// messages carry their own length information.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PathError> {
        let mut reader = Reader::new(bytes);
        let flags = PathFlags::from_bits_truncate(u16::from_be_bytes(reader.take_array()?));
        let block_hash = HashCode::from_bytes(reader.take_array::<HASH_CODE_SIZE>()?);
        let expiration = AbsoluteTime::from_be_bytes(reader.take_array()?);
        let trunc_origin = if flags.contains(PathFlags::TRUNCATED) {
            Some(PeerId::from_bytes(reader.take_array::<PEER_ID_SIZE>()?))
        } else {
            None
        };
        let count = u16::from_be_bytes(reader.take_array()?);
        let split_pos = u16::from_be_bytes(reader.take_array()?);
        let mut entries = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let signer = PeerId::from_bytes(reader.take_array::<PEER_ID_SIZE>()?);
            let signature =
                PeerSignature::from_bytes(reader.take_array::<PEER_SIGNATURE_SIZE>()?);
            entries.push(PathEntry { signer, signature });
        }
        let (last_sig, last_hop) = if flags.contains(PathFlags::RECORD_ROUTE) {
            let sig = PeerSignature::from_bytes(reader.take_array::<PEER_SIGNATURE_SIZE>()?);
            let hop = PeerId::from_bytes(reader.take_array::<PEER_ID_SIZE>()?);
            (Some(sig), Some(hop))
        } else {
            (None, None)
        };
        Ok(Path {
            flags,
            block_hash,
            expiration,
            trunc_origin,
            entries,
            split_pos,
            last_sig,
            last_hop,
        })
    }
}

/// Byte cursor for wire parsing.
struct Reader<'a> {
    bytes: &'a [u8],
    consumed: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, consumed: 0 }
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], PathError> {
        let Some((head, rest)) = self.bytes.split_first_chunk::<N>() else {
            return Err(PathError::ShortWireImage {
                needed: self.consumed + N,
                have: self.consumed + self.bytes.len(),
            });
        };
        self.bytes = rest;
        self.consumed += N;
        Ok(*head)
    }
}

#[cfg(test)]
mod tests;
