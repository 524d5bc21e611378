//! Local error types for the `gnsp-crypto` crate.

// Re-export the canonical error type from the base types crate.
pub use gnsp_types::error::CryptoError;
