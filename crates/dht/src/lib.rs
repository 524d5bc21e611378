#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # GNS Peer DHT Support
//!
//! Per-hop route attestation for DHT requests and the supporting containers
//! the routing layer needs: every hop signs the transition it performed with
//! its long-term Ed25519 key, and [`path::Path::verify`] reduces a received
//! path to the suffix whose signatures check out — a bad signature truncates
//! the path rather than surfacing an error.

pub mod bloom;
pub mod map;
pub mod path;
pub mod peers;

pub use path::{Path, PathElement, PathEntry, PathFlags};
