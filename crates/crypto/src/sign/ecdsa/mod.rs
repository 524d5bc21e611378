//! Deterministic ECDSA over the Ed25519 group.
//!
//! The PKEY scheme signs with ECDSA transplanted onto the Edwards curve: the
//! ephemeral point's compressed form, reduced modulo the group order, plays
//! the role of `r`. The nonce is derived from the private scalar and the
//! message digest, so signing consumes no entropy. Signatures travel as
//! `r ‖ s`, each component 32 bytes big-endian.
//!
//! The curve library works little-endian internally; every conversion
//! between a scalar and its wire form reverses byte order here, and nowhere
//! else.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use sha2::{Digest, Sha512};

use crate::error::CryptoError;

/// Serializes a scalar to its 32-byte big-endian wire form.
pub(crate) fn scalar_to_be(s: &Scalar) -> [u8; 32] {
    let mut bytes = s.to_bytes();
    bytes.reverse();
    bytes
}

/// Reads a 32-byte big-endian integer, reducing it modulo the group order.
pub(crate) fn scalar_from_be_reduced(be: &[u8; 32]) -> Scalar {
    let mut le = *be;
    le.reverse();
    Scalar::from_bytes_mod_order(le)
}

/// Reads a 32-byte big-endian integer, accepting only canonical scalars.
pub(crate) fn scalar_from_be_canonical(be: &[u8; 32]) -> Option<Scalar> {
    let mut le = *be;
    le.reverse();
    Option::<Scalar>::from(Scalar::from_canonical_bytes(le))
}

/// Maps the message to a scalar: SHA-512, then wide reduction.
fn message_scalar(data: &[u8]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(&Sha512::digest(data).into())
}

/// Derives the deterministic signing nonce from the private scalar and the
/// message digest.
fn nonce_scalar(d: &Scalar, data: &[u8]) -> Scalar {
    let digest = Sha512::new()
        .chain_update(d.as_bytes())
        .chain_update(Sha512::digest(data))
        .finalize();
    Scalar::from_bytes_mod_order_wide(&digest.into())
}

/// Signs `data` with the private scalar `d`, returning `r ‖ s` big-endian.
pub fn sign(d: &Scalar, data: &[u8]) -> Result<[u8; 64], CryptoError> {
    let m = message_scalar(data);
    let k = nonce_scalar(d, data);
    if k == Scalar::ZERO {
        return Err(CryptoError::SignFailed("zero nonce".into()));
    }
    let r = Scalar::from_bytes_mod_order(EdwardsPoint::mul_base(&k).compress().to_bytes());
    if r == Scalar::ZERO {
        return Err(CryptoError::SignFailed("zero r component".into()));
    }
    let s = k.invert() * (m + r * d);
    if s == Scalar::ZERO {
        return Err(CryptoError::SignFailed("zero s component".into()));
    }
    let mut out = [0u8; 64];
    let (r_out, s_out) = out.split_at_mut(32);
    r_out.copy_from_slice(&scalar_to_be(&r));
    s_out.copy_from_slice(&scalar_to_be(&s));
    Ok(out)
}

/// Verifies an `r ‖ s` signature against a public curve point.
///
/// Malformed signatures (wrong length, non-canonical or zero components)
/// verify as `false`.
pub fn verify(public: &EdwardsPoint, data: &[u8], signature: &[u8]) -> bool {
    let Some((r_be, s_be)) = split_components(signature) else {
        return false;
    };
    let (Some(r), Some(s)) = (
        scalar_from_be_canonical(&r_be),
        scalar_from_be_canonical(&s_be),
    ) else {
        return false;
    };
    if r == Scalar::ZERO || s == Scalar::ZERO {
        return false;
    }
    let m = message_scalar(data);
    let w = s.invert();
    let check = EdwardsPoint::vartime_double_scalar_mul_basepoint(&(r * w), public, &(m * w));
    Scalar::from_bytes_mod_order(check.compress().to_bytes()) == r
}

fn split_components(signature: &[u8]) -> Option<([u8; 32], [u8; 32])> {
    if signature.len() != 64 {
        return None;
    }
    let (r, s) = signature.split_at(32);
    Some((r.try_into().ok()?, s.try_into().ok()?))
}

#[cfg(test)]
mod tests;
