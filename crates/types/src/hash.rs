//! 64-byte hash codes.

use std::fmt;

use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};

use crate::base32;
use crate::error::EncodingError;

/// Size of a [`HashCode`] in bytes.
pub const HASH_CODE_SIZE: usize = 64;

/// A 512-bit hash code, treated as opaque by everything above the codec.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashCode([u8; HASH_CODE_SIZE]);

impl HashCode {
    /// The all-zero hash code.
    pub const ZERO: HashCode = HashCode([0u8; HASH_CODE_SIZE]);

    /// Computes the SHA-512 digest of `data`.
    pub fn digest(data: &[u8]) -> Self {
        let mut out = [0u8; HASH_CODE_SIZE];
        out.copy_from_slice(&Sha512::digest(data));
        HashCode(out)
    }

    /// Wraps raw digest bytes.
    pub const fn from_bytes(bytes: [u8; HASH_CODE_SIZE]) -> Self {
        HashCode(bytes)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_CODE_SIZE] {
        &self.0
    }

    /// Parses the 103-character base32 form produced by `Display`.
    pub fn from_string(s: &str) -> Result<Self, EncodingError> {
        let mut out = [0u8; HASH_CODE_SIZE];
        base32::decode_into(s, &mut out)?;
        Ok(HashCode(out))
    }
}

impl Default for HashCode {
    fn default() -> Self {
        Self::ZERO
    }
}

impl AsRef<[u8]> for HashCode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base32::encode(&self.0))
    }
}

impl fmt::Debug for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The full 103-character form is unreadable in logs; show a prefix.
        let s = base32::encode(&self.0);
        write!(f, "HashCode({}..)", &s[..12])
    }
}

impl Serialize for HashCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&base32::encode(&self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

struct HashCodeVisitor;

impl<'de> Visitor<'de> for HashCodeVisitor {
    type Value = HashCode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a 64-byte hash code or its base32 form")
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<HashCode, E> {
        HashCode::from_string(v).map_err(E::custom)
    }

    fn visit_bytes<E: DeError>(self, v: &[u8]) -> Result<HashCode, E> {
        let bytes: [u8; HASH_CODE_SIZE] = v
            .try_into()
            .map_err(|_| E::custom(format!("expected 64 bytes, got {}", v.len())))?;
        Ok(HashCode(bytes))
    }
}

impl<'de> Deserialize<'de> for HashCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(HashCodeVisitor)
        } else {
            deserializer.deserialize_bytes(HashCodeVisitor)
        }
    }
}
