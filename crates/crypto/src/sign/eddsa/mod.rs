//! EdDSA signing built on `ed25519-dalek`.
//!
//! Two signing paths exist. Seed keys sign through the standard RFC 8032
//! flow. Blinded zone keys are no longer seed-representable: they carry an
//! explicit `(scalar, hash prefix)` pair and sign through the expanded-key
//! path. Both produce signatures the standard verifier accepts.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::{clamp_integer, Scalar};
use ed25519_dalek::hazmat::{raw_sign, ExpandedSecretKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};

use crate::error::CryptoError;
use gnsp_types::PeerId;

/// An Ed25519 key pair for peer-level signing.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing: SigningKey,
}

impl Ed25519KeyPair {
    /// Generates a new key pair from the system RNG.
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Reconstructs a key pair from a stored 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Ed25519KeyPair {
            signing: SigningKey::from_bytes(seed),
        }
    }

    /// The 32-byte seed this key pair was built from.
    pub fn seed(&self) -> [u8; 32] {
        self.signing.to_bytes()
    }

    /// The 32-byte compressed public key.
    pub fn public_bytes(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }

    /// The public key in its peer-identity role.
    pub fn peer_id(&self) -> PeerId {
        PeerId::from_bytes(self.public_bytes())
    }

    /// Signs `message`, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }
}

/// Verifies a 64-byte EdDSA signature against a raw 32-byte public key.
///
/// Any malformed input (a public key that is not a curve point, an
/// out-of-range signature scalar) verifies as `false` rather than an error,
/// so callers cannot distinguish bad bytes from a wrong signer.
pub fn verify(public: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(vk) = VerifyingKey::from_bytes(public) else {
        return false;
    };
    let sig = Signature::from_bytes(signature);
    vk.verify(message, &sig).is_ok()
}

/// Expands a 32-byte seed into the clamped scalar integer and the 32-byte
/// hash prefix, per RFC 8032.
///
/// The scalar is returned as its clamped little-endian integer bytes, not as
/// a reduced [`Scalar`]: the blinding construction shifts the integer form.
pub(crate) fn expand_seed(seed: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    let digest = Sha512::digest(seed);
    let (scalar_bytes, prefix_bytes) = digest.split_at(32);
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(scalar_bytes);
    let mut prefix = [0u8; 32];
    prefix.copy_from_slice(prefix_bytes);
    (clamp_integer(scalar), prefix)
}

/// Signs with an explicit expanded key `(scalar, hash prefix)`.
pub(crate) fn sign_expanded(
    scalar: Scalar,
    hash_prefix: [u8; 32],
    message: &[u8],
) -> Result<[u8; 64], CryptoError> {
    let esk = ExpandedSecretKey {
        scalar,
        hash_prefix,
    };
    let public = EdwardsPoint::mul_base(&scalar).compress();
    let vk = VerifyingKey::from_bytes(&public.to_bytes())
        .map_err(|e| CryptoError::SignFailed(format!("expanded public key: {e}")))?;
    Ok(raw_sign::<Sha512>(&esk, message, &vk).to_bytes())
}

#[cfg(test)]
mod tests;
