//! Write payload generation
//!
//! Write phases write the same buffer into every file they create. The buffer
//! is generated once per phase, before any worker starts, and is shared
//! read-only between workers as an `Arc<[u8]>`.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fill pattern for payload initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPattern {
    /// All zeros
    Zeros,
    /// All ones (0xFF)
    Ones,
    /// Random bytes (seeded when a seed is configured)
    #[default]
    Random,
    /// Sequential bytes (0x00, 0x01, 0x02, ..., 0xFF, 0x00, ...)
    Sequential,
}

/// Immutable payload shared by all workers of a write phase
#[derive(Clone)]
pub struct Payload {
    bytes: Arc<[u8]>,
}

impl Payload {
    /// Generate a payload of `size` bytes
    ///
    /// `seed` only matters for [`FillPattern::Random`]; without one the bytes
    /// come from the thread RNG and differ between runs.
    pub fn generate(size: usize, pattern: FillPattern, seed: Option<u64>) -> Self {
        let mut buf = vec![0u8; size];

        match pattern {
            FillPattern::Zeros => {}
            FillPattern::Ones => buf.fill(0xFF),
            FillPattern::Random => match seed {
                Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed).fill_bytes(&mut buf),
                None => rand::thread_rng().fill_bytes(&mut buf),
            },
            FillPattern::Sequential => {
                for (i, byte) in buf.iter_mut().enumerate() {
                    *byte = (i % 256) as u8;
                }
            }
        }

        Self { bytes: buf.into() }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload").field("len", &self.bytes.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_size() {
        let payload = Payload::generate(1024, FillPattern::Random, None);
        assert_eq!(payload.len(), 1024);
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_payload_patterns() {
        let zeros = Payload::generate(64, FillPattern::Zeros, None);
        assert!(zeros.as_slice().iter().all(|&b| b == 0));

        let ones = Payload::generate(64, FillPattern::Ones, None);
        assert!(ones.as_slice().iter().all(|&b| b == 0xFF));

        let seq = Payload::generate(300, FillPattern::Sequential, None);
        assert_eq!(seq.as_slice()[0], 0);
        assert_eq!(seq.as_slice()[255], 255);
        assert_eq!(seq.as_slice()[256], 0);
    }

    #[test]
    fn test_seeded_payload_is_reproducible() {
        let a = Payload::generate(4096, FillPattern::Random, Some(42));
        let b = Payload::generate(4096, FillPattern::Random, Some(42));
        let c = Payload::generate(4096, FillPattern::Random, Some(43));
        assert_eq!(a.as_slice(), b.as_slice());
        assert_ne!(a.as_slice(), c.as_slice());
    }

    #[test]
    fn test_clones_share_storage() {
        let a = Payload::generate(16, FillPattern::Sequential, None);
        let b = a.clone();
        assert_eq!(a.as_slice().as_ptr(), b.as_slice().as_ptr());
    }
}
