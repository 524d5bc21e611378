#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # GNS Peer Types
//!
//! This crate is the foundational library for the GNS peer, containing the
//! core identifier types, the microsecond time scale, the Crockford base32
//! codec used for all human-readable identifiers, and the shared error
//! taxonomy.
//!
//! ## Architectural Role
//!
//! As the base crate, `gnsp-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This structure prevents
//! circular dependencies and provides a stable, canonical definition for
//! shared types like `PeerId`, `HashCode` and `AbsoluteTime`.

/// Crockford base32 codec for human-readable identifiers.
pub mod base32;
/// A unified set of all error types used across the workspace.
pub mod error;
/// 64-byte hash codes and the SHA-512 convenience digest.
pub mod hash;
/// Peer identities and peer signatures.
pub mod peer;
/// Absolute time in microseconds with the `NEVER` sentinel.
pub mod time;

pub use hash::HashCode;
pub use peer::{PeerId, PeerSignature};
pub use time::AbsoluteTime;
