//! Signature primitives underneath the zone schemes.
//!
//! These modules wrap the curve library: [`eddsa`] for RFC 8032 signing with
//! seed or expanded keys (zone EDKEY and peer hop signatures), [`ecdsa`] for
//! the deterministic ECDSA variant over the Ed25519 group used by PKEY.

pub mod ecdsa;
pub mod eddsa;
