//! The EDKEY zone scheme.
//!
//! An EDKEY private key is an RFC 8032 seed. The seed and the expanded
//! `(scalar, nonce)` pair are kept strictly separate: the seed identifies
//! and re-derives the key, the expanded pair signs. Blinding cannot be
//! expressed on the seed, so a blinded private key switches representation
//! to an explicit 64-byte `scalar ‖ nonce` payload, built with the
//! shift-multiply-shift construction that keeps the scalar a valid EdDSA
//! signing scalar. Record blocks are sealed with XSalsa20-Poly1305.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use sha2::{Digest, Sha256};
use xsalsa20poly1305::aead::Aead;
use xsalsa20poly1305::{Key, KeyInit, Nonce, XSalsa20Poly1305};

use crate::error::CryptoError;
use crate::kdf;
use crate::sign::eddsa;
use crate::zone::registry::ZoneScheme;
use crate::zone::ZoneType;
use gnsp_types::AbsoluteTime;

const SALT_XSALSA_KEY: &[u8] = b"gns-xsalsa-ctx-key";
const SALT_XSALSA_IV: &[u8] = b"gns-xsalsa-ctx-iv";

const SEED_SIZE: usize = 32;
/// Blinded representation: reduced scalar (little-endian) ‖ signing nonce.
const EXPANDED_SIZE: usize = 64;
const PUBLIC_SIZE: usize = 32;
const SIGNATURE_SIZE: usize = 64;
/// 32 bytes of XSalsa20-Poly1305 key followed by the 24-byte nonce.
const BLOCK_KEY_SIZE: usize = 56;

/// Scheme implementation for the `EDKEY` type tag.
#[derive(Debug)]
pub struct EdkeyScheme;

enum Material {
    Seed([u8; SEED_SIZE]),
    Expanded { scalar: Scalar, prefix: [u8; 32] },
}

fn material(private: &[u8]) -> Result<Material, CryptoError> {
    if let Ok(seed) = <&[u8; SEED_SIZE]>::try_from(private) {
        return Ok(Material::Seed(*seed));
    }
    if let Ok(expanded) = <&[u8; EXPANDED_SIZE]>::try_from(private) {
        let (scalar_bytes, prefix_bytes) = expanded.split_at(32);
        let mut scalar = [0u8; 32];
        scalar.copy_from_slice(scalar_bytes);
        let mut prefix = [0u8; 32];
        prefix.copy_from_slice(prefix_bytes);
        return Ok(Material::Expanded {
            scalar: Scalar::from_bytes_mod_order(scalar),
            prefix,
        });
    }
    Err(CryptoError::InvalidKeyData(format!(
        "EDKEY private key must be {SEED_SIZE} or {EXPANDED_SIZE} bytes, got {}",
        private.len()
    )))
}

fn signing_parts(private: &[u8]) -> Result<(Scalar, [u8; 32]), CryptoError> {
    match material(private)? {
        Material::Seed(seed) => {
            let (clamped, prefix) = eddsa::expand_seed(&seed);
            Ok((Scalar::from_bytes_mod_order(clamped), prefix))
        }
        Material::Expanded { scalar, prefix } => Ok((scalar, prefix)),
    }
}

/// Shifts a little-endian 256-bit integer right by three bits.
fn shift_right_3(bytes: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry = 0u8;
    for (dst, &src) in out.iter_mut().rev().zip(bytes.iter().rev()) {
        *dst = (src >> 3) | (carry << 5);
        carry = src & 0x07;
    }
    out
}

fn public_point(public: &[u8]) -> Result<EdwardsPoint, CryptoError> {
    let bytes: &[u8; PUBLIC_SIZE] = public.try_into().map_err(|_| {
        CryptoError::InvalidKeyData(format!(
            "EDKEY public key must be {PUBLIC_SIZE} bytes, got {}",
            public.len()
        ))
    })?;
    CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or_else(|| CryptoError::InvalidKeyData("EDKEY public key is not a curve point".into()))
}

/// Derives the XSalsa20-Poly1305 key and 24-byte nonce for `(zone key,
/// label, expiration)`.
fn cipher_material(public: &[u8], label: &str, expiration: AbsoluteTime) -> ([u8; 32], [u8; 24]) {
    let prk_key = kdf::extract_sha512(SALT_XSALSA_KEY, public);
    let mut skey = [0u8; 32];
    kdf::expand_sha256(&prk_key, &[label.as_bytes()], &mut skey);

    let prk_iv = kdf::extract_sha512(SALT_XSALSA_IV, public);
    let mut nonce16 = [0u8; 16];
    kdf::expand_sha256(&prk_iv, &[label.as_bytes()], &mut nonce16);

    let mut iv = [0u8; 24];
    let (nonce_part, expiration_part) = iv.split_at_mut(16);
    nonce_part.copy_from_slice(&nonce16);
    expiration_part.copy_from_slice(&expiration.to_be_bytes());
    (skey, iv)
}

impl ZoneScheme for EdkeyScheme {
    fn zone_type(&self) -> ZoneType {
        ZoneType::EDKEY
    }

    fn private_size(&self) -> usize {
        SEED_SIZE
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
        // Fresh random bytes are already a valid seed.
        rnd
    }

    fn public_from_private(&self, private: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (scalar, _) = signing_parts(private)?;
        Ok(EdwardsPoint::mul_base(&scalar).compress().to_bytes().to_vec())
    }

    fn sign(&self, private: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (scalar, prefix) = signing_parts(private)?;
        Ok(eddsa::sign_expanded(scalar, prefix, data)?.to_vec())
    }

    fn verify(&self, public: &[u8], data: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let (Ok(public), Ok(signature)) = (
            <&[u8; PUBLIC_SIZE]>::try_from(public),
            <&[u8; SIGNATURE_SIZE]>::try_from(signature),
        ) else {
            return Ok(false);
        };
        Ok(eddsa::verify(public, data, signature))
    }

    fn derive_private(
        &self,
        private: &[u8],
        h: &[u8; 64],
    ) -> Result<(Vec<u8>, [u8; 32]), CryptoError> {
        let Material::Seed(seed) = material(private)? else {
            return Err(CryptoError::InvalidKeyData(
                "blinded EDKEY keys cannot be blinded again; derive from the zone seed".into(),
            ));
        };
        let (clamped, prefix) = eddsa::expand_seed(&seed);
        let (h_scalar, h_be) = kdf::reduce_h(h);

        // a1 = a >> 3, a2 = h * a1 mod n, derived = a2 << 3. The clamped
        // scalar has its low three bits clear, so a == 8 * a1 exactly and
        // the derived public key equals h * (a * G).
        let a1 = Scalar::from_bytes_mod_order(shift_right_3(&clamped));
        let derived = h_scalar * a1 * Scalar::from(8u8);

        let blinded_prefix: [u8; 32] = Sha256::new()
            .chain_update(prefix)
            .chain_update(h_be)
            .finalize()
            .into();

        let mut payload = Vec::with_capacity(EXPANDED_SIZE);
        payload.extend_from_slice(&derived.to_bytes());
        payload.extend_from_slice(&blinded_prefix);
        Ok((payload, h_be))
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
        let (skey, iv) = cipher_material(public, label, expiration);
        let cipher = XSalsa20Poly1305::new(Key::from_slice(&skey));
        cipher
            .encrypt(Nonce::from_slice(&iv), data)
            .map_err(|_| CryptoError::SignFailed("secretbox seal refused the message".into()))
    }

    fn decrypt(
        &self,
        public: &[u8],
        data: &[u8],
        label: &str,
        expiration: AbsoluteTime,
    ) -> Result<Vec<u8>, CryptoError> {
        let (skey, iv) = cipher_material(public, label, expiration);
        let cipher = XSalsa20Poly1305::new(Key::from_slice(&skey));
        cipher.decrypt(Nonce::from_slice(&iv), data).map_err(|_| {
            log::debug!("EDKEY block decryption failed authentication");
            CryptoError::DecryptAuthFailed
        })
    }

    fn private_id_payload(&self, private: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match material(private)? {
            // An EDKEY private key is identified by its seed.
            Material::Seed(seed) => Ok(seed.to_vec()),
            // Blinded keys have no seed; fall back to the public key.
            Material::Expanded { .. } => self.public_from_private(private),
        }
    }
}
