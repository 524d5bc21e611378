//! The process-wide zone scheme registry.
//!
//! The table from type tag to scheme implementation is built once, before
//! any zone operation runs, and then frozen. After the freeze it is
//! read-only and safe for unlimited concurrent readers; registration
//! attempts are rejected and logged. Byte-length queries go through the tag
//! so that length calculations work on partially deserialized objects.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::error::CryptoError;
use crate::zone::edkey::EdkeyScheme;
use crate::zone::pkey::PkeyScheme;
use crate::zone::ZoneType;
use gnsp_types::AbsoluteTime;

/// One zone cryptography scheme: key representation, signatures, blinding
/// and the label-scoped block cipher.
///
/// Implementations are stateless; all key material travels as byte slices
/// whose lengths the size accessors describe. New schemes implement this
/// trait and register under a fresh type tag — callers of the zone façade
/// never change.
pub trait ZoneScheme: Send + Sync + std::fmt::Debug {
    /// The type tag this scheme registers under.
    fn zone_type(&self) -> ZoneType;

    /// Private key payload size in bytes.
    fn private_size(&self) -> usize;

    /// Public key payload size in bytes.
    fn public_size(&self) -> usize;

    /// Signature payload size in bytes.
    fn signature_size(&self) -> usize;

    /// Size of the derived symmetric block key material in bytes.
    fn block_key_size(&self) -> usize;

    /// Turns `private_size` fresh random bytes into valid private key
    /// material.
    fn prepare(&self, rnd: Vec<u8>) -> Vec<u8>;

    /// Computes the public key payload for a private key.
    fn public_from_private(&self, private: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Signs `data` with the private key.
    fn sign(&self, private: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verifies a signature. Malformed signature bytes yield `Ok(false)`,
    /// never an error, so bad bytes are indistinguishable from a wrong
    /// signer.
    fn verify(&self, public: &[u8], data: &[u8], signature: &[u8]) -> Result<bool, CryptoError>;

    /// Blinds a private key under the raw 64-byte factor `h`, returning the
    /// derived payload and `h` reduced to the scheme's group order
    /// (big-endian).
    fn derive_private(&self, private: &[u8], h: &[u8; 64])
        -> Result<(Vec<u8>, [u8; 32]), CryptoError>;

    /// Blinds a public key under the raw 64-byte factor `h`.
    fn derive_public(&self, public: &[u8], h: &[u8; 64])
        -> Result<(Vec<u8>, [u8; 32]), CryptoError>;

    /// Derives the symmetric block key material for `(public, label,
    /// expiration)`.
    fn block_key(&self, public: &[u8], label: &str, expiration: AbsoluteTime) -> Vec<u8>;

    /// Encrypts `data` under the derived block key.
    fn encrypt(
        &self,
        public: &[u8],
        data: &[u8],
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Decrypts `data` under the derived block key.
    fn decrypt(
        &self,
        public: &[u8],
        data: &[u8],
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError>;

    /// The payload whose tagged base32 form identifies a private key.
    fn private_id_payload(&self, private: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// The scheme table. Append-only while unfrozen, read-only afterwards.
pub struct Registry {
    schemes: RwLock<BTreeMap<u32, &'static dyn ZoneScheme>>,
    frozen: AtomicBool,
}

impl Registry {
    fn new() -> Self {
        Registry {
            schemes: RwLock::new(BTreeMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    /// Adds a scheme under its type tag. Returns `false` without modifying
    /// the table if the registry is frozen or the tag is already taken.
    pub fn register(&self, scheme: &'static dyn ZoneScheme) -> bool {
        let tag = scheme.zone_type().as_u32();
        if self.frozen.load(Ordering::Acquire) {
            log::warn!("zone scheme registry is frozen; rejected registration of 0x{tag:08x}");
            return false;
        }
        let mut map = write_lock(&self.schemes);
        if map.contains_key(&tag) {
            log::warn!("zone scheme 0x{tag:08x} is already registered");
            return false;
        }
        map.insert(tag, scheme);
        true
    }

    /// Ends the registration phase.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Looks up the scheme for a type tag.
    pub fn get(&self, ztype: ZoneType) -> Result<&'static dyn ZoneScheme, CryptoError> {
        read_lock(&self.schemes)
            .get(&ztype.as_u32())
            .copied()
            .ok_or(CryptoError::UnknownZoneType(ztype.as_u32()))
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

static PKEY: PkeyScheme = PkeyScheme;
static EDKEY: EdkeyScheme = EdkeyScheme;

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    registry.register(&PKEY);
    registry.register(&EDKEY);
    registry.freeze();
    registry
});

/// The global registry with the built-in schemes, frozen.
pub fn global() -> &'static Registry {
    &REGISTRY
}

/// Looks up a scheme in the global registry.
pub fn scheme(ztype: ZoneType) -> Result<&'static dyn ZoneScheme, CryptoError> {
    REGISTRY.get(ztype)
}
