//! Bloom filter over hash codes, with an optional mutator salt.
//!
//! DHT requests carry a filter of already-visited peers so routing does not
//! loop. Requests re-randomize the filter per query with a 4-byte mutator:
//! when set, the key is re-hashed together with the mutator before its bit
//! positions are taken, so two queries for the same key probe different
//! bits.

use sha2::{Digest, Sha512};

use gnsp_types::HashCode;

/// A fixed-size bloom filter addressed by [`HashCode`] keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    bits: Vec<u8>,
    mutator: Option<u32>,
}

impl BloomFilter {
    /// Creates an empty filter of `size` bytes (at least one).
    pub fn new(size: usize) -> Self {
        BloomFilter {
            bits: vec![0u8; size.max(1)],
            mutator: None,
        }
    }

    /// Creates an empty filter with a mutator salt.
    pub fn with_mutator(size: usize, mutator: u32) -> Self {
        let mut filter = Self::new(size);
        filter.mutator = Some(mutator);
        filter
    }

    /// Sets the mutator salt for subsequent operations.
    pub fn set_mutator(&mut self, mutator: u32) {
        self.mutator = Some(mutator);
    }

    /// The raw filter bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Reconstructs a filter from wire bytes and the query's mutator.
    pub fn from_bytes(bits: &[u8], mutator: Option<u32>) -> Self {
        BloomFilter {
            bits: if bits.is_empty() {
                vec![0u8]
            } else {
                bits.to_vec()
            },
            mutator,
        }
    }

    /// Bit positions for `key`: consecutive 4-byte big-endian words of the
    /// (optionally mutated) digest, reduced by the filter width.
    fn positions(&self, key: &HashCode) -> Vec<usize> {
        let digest = match self.mutator {
            Some(mutator) => {
                let mutated: [u8; 64] = Sha512::new()
                    .chain_update(mutator.to_be_bytes())
                    .chain_update(key.as_bytes())
                    .finalize()
                    .into();
                HashCode::from_bytes(mutated)
            }
            None => *key,
        };
        let width = self.bits.len() * 8;
        digest
            .as_bytes()
            .chunks_exact(4)
            .map(|chunk| {
                let mut word = [0u8; 4];
                word.copy_from_slice(chunk);
                u32::from_be_bytes(word) as usize % width
            })
            .collect()
    }

    /// Inserts `key` into the filter.
    pub fn add(&mut self, key: &HashCode) {
        for position in self.positions(key) {
            if let Some(byte) = self.bits.get_mut(position / 8) {
                *byte |= 1 << (position % 8);
            }
        }
    }

    /// True if `key` may have been inserted; false means definitely not.
    pub fn contains(&self, key: &HashCode) -> bool {
        self.positions(key).iter().all(|&position| {
            self.bits
                .get(position / 8)
                .is_some_and(|byte| byte & (1 << (position % 8)) != 0)
        })
    }

    /// Merges another filter of the same geometry into this one. Returns
    /// `false` if the sizes differ.
    pub fn or(&mut self, other: &BloomFilter) -> bool {
        if self.bits.len() != other.bits.len() {
            return false;
        }
        for (dst, src) in self.bits.iter_mut().zip(other.bits.iter()) {
            *dst |= src;
        }
        true
    }
}
