//! HKDF helpers (RFC 5869) in the extract/expand split the protocol uses:
//! SHA-512 for extraction, SHA-256 (or SHA-512) for expansion.
//!
//! The salts and info strings are externally observable; every derivation in
//! this crate routes through these helpers so the byte-exact labels live in
//! one place.

use curve25519_dalek::scalar::Scalar;
use hkdf::Hkdf;
use sha2::{Sha256, Sha512};

/// Salt for the blinding-factor derivation.
pub const SALT_KEY_DERIVATION: &[u8] = b"key-derivation";

/// Size of an extracted PRK in bytes (SHA-512 output).
pub const PRK_SIZE: usize = 64;

/// HKDF-Extract with SHA-512.
pub fn extract_sha512(salt: &[u8], ikm: &[u8]) -> [u8; PRK_SIZE] {
    let (prk, _) = Hkdf::<Sha512>::extract(Some(salt), ikm);
    prk.into()
}

/// HKDF-Expand with SHA-256 over a SHA-512 PRK.
///
/// `info` parts are concatenated without separators. The fixed 64-byte PRK
/// always satisfies `from_prk`, and every caller in this workspace requests
/// far less than the 255-block HKDF output limit, so expansion cannot fail.
#[allow(clippy::expect_used)]
pub fn expand_sha256(prk: &[u8; PRK_SIZE], info: &[&[u8]], okm: &mut [u8]) {
    Hkdf::<Sha256>::from_prk(prk)
        .expect("64-byte PRK is valid for SHA-256 expansion")
        .expand_multi_info(info, okm)
        .expect("OKM request within HKDF limit");
}

/// HKDF-Expand with SHA-512.
#[allow(clippy::expect_used)]
pub fn expand_sha512(prk: &[u8; PRK_SIZE], info: &[&[u8]], okm: &mut [u8]) {
    Hkdf::<Sha512>::from_prk(prk)
        .expect("64-byte PRK is valid for SHA-512 expansion")
        .expand_multi_info(info, okm)
        .expect("OKM request within HKDF limit");
}

/// Derives the raw 64-byte blinding factor `h` for `(public key, label,
/// context)`.
///
/// The result is a big-endian integer, deliberately unreduced: each scheme
/// reduces it modulo its own group order. Public and private derivation use
/// the same `h` so that deriving a public key commutes with computing the
/// public half of a derived private key.
pub fn derive_h(public: &[u8], label: &str, context: &str) -> [u8; 64] {
    let prk = extract_sha512(SALT_KEY_DERIVATION, public);
    let mut h = [0u8; 64];
    expand_sha256(&prk, &[label.as_bytes(), context.as_bytes()], &mut h);
    h
}

/// Reduces a raw big-endian blinding factor modulo the Ed25519 group order.
///
/// Returns the scalar for group arithmetic together with its 32-byte
/// big-endian form, which callers embed in query identifiers.
pub fn reduce_h(h: &[u8; 64]) -> (Scalar, [u8; 32]) {
    let mut le = *h;
    le.reverse();
    let scalar = Scalar::from_bytes_mod_order_wide(&le);
    let mut be = scalar.to_bytes();
    be.reverse();
    (scalar, be)
}
