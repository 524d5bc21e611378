//! Scheme-agnostic zone keys, signatures and blinding.
//!
//! A zone object is the product of a 32-bit type tag and an opaque payload;
//! every operation dispatches through the [`registry`]. Wire forms are
//! always `tag (4 bytes big-endian) ‖ payload`, with the payload length
//! determined by the tag, so consumers can size buffers without touching
//! the payload.

pub mod registry;

mod edkey;
mod pkey;

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::kdf;
use gnsp_types::base32;
use gnsp_types::error::EncodingError;
use gnsp_types::AbsoluteTime;

/// A 32-bit zone type tag, big-endian on the wire.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneType(u32);

impl ZoneType {
    /// Curve25519 scalar keys with deterministic ECDSA signatures.
    pub const PKEY: ZoneType = ZoneType(0x0001_0000);
    /// Seed-based Ed25519 keys with EdDSA signatures.
    pub const EDKEY: ZoneType = ZoneType(0x0001_0001);

    /// Wraps a raw tag value.
    pub const fn from_u32(value: u32) -> Self {
        ZoneType(value)
    }

    /// The raw tag value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// The 4-byte big-endian wire form.
    pub const fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Debug for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ZoneType::PKEY => f.write_str("PKEY"),
            ZoneType::EDKEY => f.write_str("EDKEY"),
            ZoneType(other) => write!(f, "ZoneType(0x{other:08x})"),
        }
    }
}

/// Splits a tagged wire image into its type and payload.
fn split_tagged(bytes: &[u8]) -> Result<(ZoneType, &[u8]), CryptoError> {
    let Some((tag, payload)) = bytes.split_first_chunk::<4>() else {
        return Err(CryptoError::InvalidKeyData(
            "wire image shorter than the 4-byte type tag".into(),
        ));
    };
    Ok((ZoneType::from_u32(u32::from_be_bytes(*tag)), payload))
}

fn tagged_wire(ztype: ZoneType, parts: &[&[u8]]) -> Vec<u8> {
    let len = 4 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&ztype.to_be_bytes());
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// A private zone key: type tag plus scheme-specific secret payload.
///
/// The payload is zeroized on drop. An all-zero payload is well-formed for
/// length and identifier purposes but refuses to sign.
#[derive(Clone)]
pub struct ZonePrivate {
    ztype: ZoneType,
    data: Zeroizing<Vec<u8>>,
}

impl ZonePrivate {
    /// Creates a private key of the given type.
    ///
    /// With `seed` present the bytes are used as the key material and must
    /// have the scheme's private size. Without a seed, fresh bytes are drawn
    /// from the system RNG and passed through the scheme's `prepare` step;
    /// this is the only entropy-consuming operation in the crate.
    pub fn create(ztype: ZoneType, seed: Option<&[u8]>) -> Result<Self, CryptoError> {
        let scheme = registry::scheme(ztype)?;
        let data = match seed {
            Some(bytes) => {
                if bytes.len() != scheme.private_size() {
                    return Err(CryptoError::InvalidKeyData(format!(
                        "seed must be {} bytes, got {}",
                        scheme.private_size(),
                        bytes.len()
                    )));
                }
                bytes.to_vec()
            }
            None => {
                let mut rnd = vec![0u8; scheme.private_size()];
                OsRng.fill_bytes(&mut rnd);
                scheme.prepare(rnd)
            }
        };
        Ok(ZonePrivate {
            ztype,
            data: Zeroizing::new(data),
        })
    }

    /// The type tag.
    pub fn zone_type(&self) -> ZoneType {
        self.ztype
    }

    /// The raw secret payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// True iff the payload is all zero.
    pub fn is_null(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Computes the matching public key.
    pub fn public(&self) -> Result<ZoneKey, CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        Ok(ZoneKey {
            ztype: self.ztype,
            data: scheme.public_from_private(&self.data)?,
        })
    }

    /// Signs `data`, embedding the matching public key in the signature.
    pub fn sign(&self, data: &[u8]) -> Result<ZoneSignature, CryptoError> {
        if self.is_null() {
            return Err(CryptoError::SignFailed(
                "refusing to sign with the null key".into(),
            ));
        }
        let scheme = registry::scheme(self.ztype)?;
        Ok(ZoneSignature {
            key: self.public()?,
            data: scheme.sign(&self.data, data)?,
        })
    }

    /// Blinds this key under `(label, context)`.
    ///
    /// Returns the derived private key together with the reduced blinding
    /// factor, big-endian, from which callers reconstruct query identifiers.
    pub fn derive(
        &self,
        label: &str,
        context: &str,
    ) -> Result<(ZonePrivate, [u8; 32]), CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        let public = self.public()?;
        let h = kdf::derive_h(public.as_bytes(), label, context);
        let (derived, h_mod_n) = scheme.derive_private(&self.data, &h)?;
        Ok((
            ZonePrivate {
                ztype: self.ztype,
                data: Zeroizing::new(derived),
            },
            h_mod_n,
        ))
    }

    /// The human-readable identifier of this private key.
    ///
    /// PKEY keys identify through their public key, EDKEY keys through the
    /// tagged seed.
    pub fn id(&self) -> Result<String, CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        let payload = scheme.private_id_payload(&self.data)?;
        Ok(base32::encode(&tagged_wire(self.ztype, &[&payload])))
    }

    /// The tagged wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        tagged_wire(self.ztype, &[&self.data])
    }

    /// Parses the tagged wire form, validating the payload length against
    /// the registry.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (ztype, payload) = split_tagged(bytes)?;
        let scheme = registry::scheme(ztype)?;
        if payload.len() != scheme.private_size() {
            return Err(CryptoError::InvalidKeyData(format!(
                "private payload must be {} bytes, got {}",
                scheme.private_size(),
                payload.len()
            )));
        }
        Ok(ZonePrivate {
            ztype,
            data: Zeroizing::new(payload.to_vec()),
        })
    }
}

impl fmt::Debug for ZonePrivate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        write!(f, "ZonePrivate({:?}, <{} bytes>)", self.ztype, self.data.len())
    }
}

/// A public zone key.
///
/// Equality and hashing consider only the payload: within a scheme the type
/// is implied by context. Wire-level comparisons go through [`Self::to_bytes`].
#[derive(Clone)]
pub struct ZoneKey {
    ztype: ZoneType,
    data: Vec<u8>,
}

impl ZoneKey {
    /// Wraps a public key payload, validating its length.
    pub fn new(ztype: ZoneType, data: Vec<u8>) -> Result<Self, CryptoError> {
        let scheme = registry::scheme(ztype)?;
        if data.len() != scheme.public_size() {
            return Err(CryptoError::InvalidKeyData(format!(
                "public payload must be {} bytes, got {}",
                scheme.public_size(),
                data.len()
            )));
        }
        Ok(ZoneKey { ztype, data })
    }

    /// The type tag.
    pub fn zone_type(&self) -> ZoneType {
        self.ztype
    }

    /// The raw public payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// True iff the payload is all zero.
    pub fn is_null(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Verifies `signature` over `data` against this key.
    ///
    /// This key is authoritative: the key embedded in the signature is
    /// ignored. `Ok(false)` covers both a wrong signer and malformed
    /// signature bytes.
    pub fn verify(&self, data: &[u8], signature: &ZoneSignature) -> Result<bool, CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        scheme.verify(&self.data, data, signature.as_bytes())
    }

    /// Blinds this key under `(label, context)`.
    pub fn derive(&self, label: &str, context: &str) -> Result<(ZoneKey, [u8; 32]), CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        let h = kdf::derive_h(&self.data, label, context);
        let (derived, h_mod_n) = scheme.derive_public(&self.data, &h)?;
        Ok((
            ZoneKey {
                ztype: self.ztype,
                data: derived,
            },
            h_mod_n,
        ))
    }

    /// Derives the symmetric block key material for `(label, expiration)`.
    pub fn block_key(
        &self,
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        Ok(scheme.block_key(&self.data, label, expiration))
    }

    /// Encrypts a record block scoped to `(label, expiration)`.
    pub fn encrypt(
        &self,
        data: &[u8],
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        scheme.encrypt(&self.data, data, label, expiration)
    }

    /// Decrypts a record block scoped to `(label, expiration)`.
    pub fn decrypt(
        &self,
        data: &[u8],
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError> {
        let scheme = registry::scheme(self.ztype)?;
        scheme.decrypt(&self.data, data, label, expiration)
    }

    /// The human-readable zone identifier: base32 of the tagged wire form.
    pub fn id(&self) -> String {
        base32::encode(&self.to_bytes())
    }

    /// The tagged wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        tagged_wire(self.ztype, &[&self.data])
    }

    /// Parses the tagged wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (ztype, payload) = split_tagged(bytes)?;
        ZoneKey::new(ztype, payload.to_vec())
    }
}

impl PartialEq for ZoneKey {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for ZoneKey {}

impl std::hash::Hash for ZoneKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl fmt::Debug for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneKey({:?}, {})", self.ztype, self.id())
    }
}

impl FromStr for ZoneKey {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.len() * 5 / 8;
        let bytes = base32::decode(s, len)?;
        ZoneKey::from_bytes(&bytes).map_err(|e| EncodingError::InvalidEncoding(e.to_string()))
    }
}

/// A zone signature: the signer's public key followed by the raw signature.
#[derive(Clone, PartialEq, Eq)]
pub struct ZoneSignature {
    key: ZoneKey,
    data: Vec<u8>,
}

impl ZoneSignature {
    /// Assembles a signature object, validating the byte length.
    pub fn new(key: ZoneKey, data: Vec<u8>) -> Result<Self, CryptoError> {
        let scheme = registry::scheme(key.zone_type())?;
        if data.len() != scheme.signature_size() {
            return Err(CryptoError::InvalidKeyData(format!(
                "signature must be {} bytes, got {}",
                scheme.signature_size(),
                data.len()
            )));
        }
        Ok(ZoneSignature { key, data })
    }

    /// The public key the signer embedded.
    pub fn zone_key(&self) -> &ZoneKey {
        &self.key
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The tagged wire form: `type ‖ key ‖ signature`.
    pub fn to_bytes(&self) -> Vec<u8> {
        tagged_wire(self.key.ztype, &[&self.key.data, &self.data])
    }

    /// Parses the tagged wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (ztype, payload) = split_tagged(bytes)?;
        let scheme = registry::scheme(ztype)?;
        let expected = scheme.public_size() + scheme.signature_size();
        if payload.len() != expected {
            return Err(CryptoError::InvalidKeyData(format!(
                "signature wire payload must be {expected} bytes, got {}",
                payload.len()
            )));
        }
        let (key_part, sig_part) = payload.split_at(scheme.public_size());
        Ok(ZoneSignature {
            key: ZoneKey::new(ztype, key_part.to_vec())?,
            data: sig_part.to_vec(),
        })
    }
}

impl fmt::Debug for ZoneSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneSignature({:?}, <{} bytes>)", self.key.ztype, self.data.len())
    }
}
