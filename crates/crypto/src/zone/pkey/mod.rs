//! The PKEY zone scheme.
//!
//! A PKEY private key is a bare Curve25519-group scalar, stored big-endian
//! and used exactly as supplied (no clamping, no reduction at init — random
//! key preparation passes the bytes through untouched for wire
//! compatibility). Signatures are deterministic ECDSA over the Ed25519
//! group; record blocks are encrypted with AES-256-CTR under a key and IV
//! derived from `(zone key, label, expiration)`.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;

use crate::error::CryptoError;
use crate::kdf;
use crate::sign::ecdsa;
use crate::zone::registry::ZoneScheme;
use crate::zone::ZoneType;
use gnsp_types::AbsoluteTime;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

const SALT_AES_KEY: &[u8] = b"gns-aes-ctx-key";
const SALT_AES_IV: &[u8] = b"gns-aes-ctx-iv";

const PRIVATE_SIZE: usize = 32;
const PUBLIC_SIZE: usize = 32;
const SIGNATURE_SIZE: usize = 64;
/// 32 bytes of AES-256 key followed by the 16-byte IV.
const BLOCK_KEY_SIZE: usize = 48;

/// Scheme implementation for the `PKEY` type tag.
#[derive(Debug)]
pub struct PkeyScheme;

fn private_scalar(private: &[u8]) -> Result<Scalar, CryptoError> {
    let be: &[u8; PRIVATE_SIZE] = private.try_into().map_err(|_| {
        CryptoError::InvalidKeyData(format!(
            "PKEY private key must be {PRIVATE_SIZE} bytes, got {}",
            private.len()
        ))
    })?;
    Ok(ecdsa::scalar_from_be_reduced(be))
}

fn public_point(public: &[u8]) -> Result<EdwardsPoint, CryptoError> {
    let bytes: &[u8; PUBLIC_SIZE] = public.try_into().map_err(|_| {
        CryptoError::InvalidKeyData(format!(
            "PKEY public key must be {PUBLIC_SIZE} bytes, got {}",
            public.len()
        ))
    })?;
    CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or_else(|| CryptoError::InvalidKeyData("PKEY public key is not a curve point".into()))
}

/// Derives the AES-256 key and the CTR IV for `(zone key, label,
/// expiration)`.
fn cipher_material(public: &[u8], label: &str, expiration: AbsoluteTime) -> ([u8; 32], [u8; 16]) {
    let prk_key = kdf::extract_sha512(SALT_AES_KEY, public);
    let mut skey = [0u8; 32];
    kdf::expand_sha256(&prk_key, &[label.as_bytes()], &mut skey);

    let prk_iv = kdf::extract_sha512(SALT_AES_IV, public);
    let mut nonce = [0u8; 4];
    kdf::expand_sha256(&prk_iv, &[label.as_bytes()], &mut nonce);

    let mut iv = [0u8; 16];
    let (nonce_part, rest) = iv.split_at_mut(4);
    nonce_part.copy_from_slice(&nonce);
    let (expiration_part, counter_part) = rest.split_at_mut(8);
    expiration_part.copy_from_slice(&expiration.to_be_bytes());
    counter_part.copy_from_slice(&1u32.to_be_bytes());
    (skey, iv)
}

/// CTR is an XOR stream: encryption and decryption are the same operation.
fn apply_ctr(
    public: &[u8],
    data: &[u8],
    label: &str,
    expiration: AbsoluteTime,
) -> Vec<u8> {
    let (skey, iv) = cipher_material(public, label, expiration);
    let mut out = data.to_vec();
    let mut cipher = Aes256Ctr::new(&skey.into(), &iv.into());
    cipher.apply_keystream(&mut out);
    out
}

impl ZoneScheme for PkeyScheme {
    fn zone_type(&self) -> ZoneType {
        ZoneType::PKEY
    }

    fn private_size(&self) -> usize {
        PRIVATE_SIZE
    }

    fn public_size(&self) -> usize {
        PUBLIC_SIZE
    }

    fn signature_size(&self) -> usize {
        SIGNATURE_SIZE
    }

    fn block_key_size(&self) -> usize {
        BLOCK_KEY_SIZE
    }

    fn prepare(&self, rnd: Vec<u8>) -> Vec<u8> {
        // The random scalar is used as-is.
        rnd
    }

    fn public_from_private(&self, private: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let d = private_scalar(private)?;
        Ok(EdwardsPoint::mul_base(&d).compress().to_bytes().to_vec())
    }

    fn sign(&self, private: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let d = private_scalar(private)?;
        Ok(ecdsa::sign(&d, data)?.to_vec())
    }

    fn verify(&self, public: &[u8], data: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let Ok(point) = public_point(public) else {
            return Ok(false);
        };
        Ok(ecdsa::verify(&point, data, signature))
    }

    fn derive_private(
        &self,
        private: &[u8],
        h: &[u8; 64],
    ) -> Result<(Vec<u8>, [u8; 32]), CryptoError> {
        let d = private_scalar(private)?;
        let (h_scalar, h_be) = kdf::reduce_h(h);
        let derived = h_scalar * d;
        Ok((ecdsa::scalar_to_be(&derived).to_vec(), h_be))
    }

    fn derive_public(
        &self,
        public: &[u8],
        h: &[u8; 64],
    ) -> Result<(Vec<u8>, [u8; 32]), CryptoError> {
        let point = public_point(public)?;
        let (h_scalar, h_be) = kdf::reduce_h(h);
        let derived = h_scalar * point;
        Ok((derived.compress().to_bytes().to_vec(), h_be))
    }

    fn block_key(&self, public: &[u8], label: &str, expiration: AbsoluteTime) -> Vec<u8> {
        let (skey, iv) = cipher_material(public, label, expiration);
        let mut out = Vec::with_capacity(BLOCK_KEY_SIZE);
        out.extend_from_slice(&skey);
        out.extend_from_slice(&iv);
        out
    }

    fn encrypt(
        &self,
        public: &[u8],
        data: &[u8],
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(apply_ctr(public, data, label, expiration))
    }

    fn decrypt(
        &self,
        public: &[u8],
        data: &[u8],
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(apply_ctr(public, data, label, expiration))
    }

    fn private_id_payload(&self, private: &[u8]) -> Result<Vec<u8>, CryptoError> {
        // A PKEY private key is identified through its public key.
        self.public_from_private(private)
    }
}

#[cfg(test)]
mod tests;
