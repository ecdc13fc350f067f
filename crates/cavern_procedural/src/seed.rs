//! # Level Seeds
//!
//! Seeds are human-typed strings. They are hashed to 64 bits and fed to a
//! ChaCha RNG, so the same string produces exactly the same level on any
//! platform.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Hashed level seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelSeed(u64);

impl LevelSeed {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    /// Creates a seed from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Hashes a seed string (FNV-1a). Any string is valid, including "".
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut hash = Self::FNV_OFFSET;
        for byte in text.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(Self::FNV_PRIME);
        }
        Self(hash)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Creates the generator RNG for this seed.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

/// Seed string derived from the wall clock, used in random-seed mode.
///
/// Nanoseconds since the epoch; falls back to "0" on a clock set before 1970.
#[must_use]
pub fn clock_seed_text() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_text_same_seed() {
        assert_eq!(LevelSeed::from_text("test"), LevelSeed::from_text("test"));
        assert_ne!(LevelSeed::from_text("test"), LevelSeed::from_text("tesT"));
    }

    #[test]
    fn test_empty_text_is_valid() {
        assert_eq!(LevelSeed::from_text("").value(), LevelSeed::FNV_OFFSET);
    }

    #[test]
    fn test_rng_is_deterministic() {
        let mut a = LevelSeed::from_text("cave").rng();
        let mut b = LevelSeed::from_text("cave").rng();
        for _ in 0..64 {
            assert_eq!(a.gen_range(0..100), b.gen_range(0..100));
        }
    }

    #[test]
    fn test_clock_seed_is_numeric() {
        let text = clock_seed_text();
        assert!(!text.is_empty());
        assert!(text.chars().all(|c| c.is_ascii_digit()));
    }
}
