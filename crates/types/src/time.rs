//! Absolute time at microsecond resolution.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// An absolute point in time: unsigned microseconds since the Unix epoch.
///
/// The ordering is total and [`AbsoluteTime::NEVER`] compares strictly
/// greater than every finite value. Expiration timestamps use `NEVER` for
/// records that do not expire.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct AbsoluteTime(u64);

impl AbsoluteTime {
    /// The "end of time" sentinel.
    pub const NEVER: AbsoluteTime = AbsoluteTime(u64::MAX);

    /// The Unix epoch.
    pub const ZERO: AbsoluteTime = AbsoluteTime(0);

    /// Wraps a microsecond count.
    pub const fn from_micros(micros: u64) -> Self {
        AbsoluteTime(micros)
    }

    /// Returns the microsecond count.
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// The current wall-clock time.
    ///
    /// This is the only clock-reading operation in the workspace; all
    /// cryptographic derivations treat expiration values as plain data.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        AbsoluteTime(micros)
    }

    /// True for the `NEVER` sentinel.
    pub const fn is_never(&self) -> bool {
        self.0 == u64::MAX
    }

    /// True iff the value is finite and lies in the past.
    pub fn is_expired(&self) -> bool {
        !self.is_never() && *self < Self::now()
    }

    /// Adds a microsecond count, saturating at `NEVER`.
    pub const fn add_micros(&self, micros: u64) -> Self {
        AbsoluteTime(self.0.saturating_add(micros))
    }

    /// The 8-byte big-endian wire form.
    pub const fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Parses the 8-byte big-endian wire form.
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        AbsoluteTime(u64::from_be_bytes(bytes))
    }
}

impl From<u64> for AbsoluteTime {
    fn from(micros: u64) -> Self {
        AbsoluteTime(micros)
    }
}

impl fmt::Display for AbsoluteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            f.write_str("end of time")
        } else {
            write!(f, "{}us", self.0)
        }
    }
}

impl fmt::Debug for AbsoluteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AbsoluteTime({})", self)
    }
}
