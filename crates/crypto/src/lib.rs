//! # GNS Peer Zone Cryptography
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! The crypto-agility layer of the GNS peer. A process-wide registry maps
//! zone type tags to scheme implementations; the [`zone`] façade exposes
//! scheme-agnostic private keys, public keys and signatures with key
//! blinding, label-scoped block ciphers and wire (de)serialization on top.
//! Two schemes are registered: PKEY (deterministic ECDSA over the Ed25519
//! group, AES-256-CTR block cipher) and EDKEY (EdDSA, XSalsa20-Poly1305
//! block cipher).

pub mod error;
pub mod kdf;
pub mod sign;
pub mod zone;

pub use zone::{ZoneKey, ZonePrivate, ZoneSignature, ZoneType};
