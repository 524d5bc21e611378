//! Core error types for the GNS peer.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors surfaced by the zone cryptography layer.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// An operation referenced a zone type tag that is not in the registry.
    #[error("Unknown zone type: 0x{0:08x}")]
    UnknownZoneType(u32),
    /// Provided key material does not satisfy the scheme's structural constraints.
    #[error("Invalid key data: {0}")]
    InvalidKeyData(String),
    /// The underlying signature primitive refused to sign.
    #[error("Signing failed: {0}")]
    SignFailed(String),
    /// Authenticated decryption failed its tag check.
    #[error("Decryption failed authentication")]
    DecryptAuthFailed,
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownZoneType(_) => "CRYPTO_UNKNOWN_ZONE_TYPE",
            Self::InvalidKeyData(_) => "CRYPTO_INVALID_KEY_DATA",
            Self::SignFailed(_) => "CRYPTO_SIGN_FAILED",
            Self::DecryptAuthFailed => "CRYPTO_DECRYPT_AUTH_FAILED",
        }
    }
}

/// Errors produced by the base32 codec.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    /// The input contained a character outside the Crockford alphabet,
    /// or its length does not match the expected output size.
    #[error("Invalid base32 encoding: {0}")]
    InvalidEncoding(String),
    /// The output buffer cannot hold the decoded bytes.
    #[error("Output buffer too small: need {needed} bytes, have {have}")]
    BufferTooSmall {
        /// Bytes the decoded string requires.
        needed: usize,
        /// Bytes the caller provided.
        have: usize,
    },
}

impl ErrorCode for EncodingError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidEncoding(_) => "ENCODING_INVALID",
            Self::BufferTooSmall { .. } => "ENCODING_BUFFER_TOO_SMALL",
        }
    }
}

/// Errors produced by the DHT path layer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    /// An element was appended or verified before its signature was attached.
    #[error("Path element carries no signature")]
    NoSignature,
    /// A path wire image was shorter than its headers claim.
    #[error("Truncated path wire image: need {needed} bytes, have {have}")]
    ShortWireImage {
        /// Bytes the headers claim.
        needed: usize,
        /// Bytes actually present.
        have: usize,
    },
}

impl ErrorCode for PathError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoSignature => "PATH_NO_SIGNATURE",
            Self::ShortWireImage { .. } => "PATH_SHORT_WIRE_IMAGE",
        }
    }
}
