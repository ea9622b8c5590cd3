//! Deterministic random number generation for dealing decks.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical deals
//! - **Context streams**: Independent sequences per chapter attempt, so a
//!   retry deals a fresh deck without disturbing later attempts
//! - **Explicit Fisher–Yates**: shuffles and draws are written out rather
//!   than delegated, so the permutation contract is visible and testable
//!
//! ```
//! use chapter_match::core::GameRng;
//!
//! let rng = GameRng::new(42);
//!
//! let mut first = rng.for_context("deck/1/1");
//! let mut again = GameRng::new(42).for_context("deck/1/1");
//! assert_eq!(first.gen_range_usize(0..100), again.gen_range_usize(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Deterministic RNG used by the deck builder.
///
/// Uses ChaCha8 for speed while keeping a uniform, well-mixed stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    /// `FxHasher` output does not depend on the toolchain.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    ///
    /// Fisher–Yates: for `i` from the last index down to 1, swap with a
    /// uniformly random index in `[0, i]`.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_range_usize(0..i + 1);
            slice.swap(i, j);
        }
    }

    /// Draw `count` distinct indices from `0..len`, uniformly without
    /// replacement.
    ///
    /// Runs a partial Fisher–Yates over the index list. When `count`
    /// exceeds `len`, every index is returned (in random order).
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        let take = count.min(len);
        let mut indices: Vec<usize> = (0..len).collect();
        for i in 0..take {
            let j = self.gen_range_usize(i..len);
            indices.swap(i, j);
        }
        indices.truncate(take);
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_produces_different_sequence() {
        let rng = GameRng::new(42);
        let mut ctx1 = rng.for_context("deck/1/1");
        let mut ctx2 = rng.for_context("deck/1/2");

        let seq1: Vec<_> = (0..10).map(|_| ctx1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| ctx2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_seed_is_stable() {
        let rng = GameRng::new(42);
        assert_eq!(rng.seed(), 42);
        assert_eq!(rng.for_context("deck/1/1").seed(), rng.for_context("deck/1/1").seed());
        assert_ne!(rng.for_context("deck/1/1").seed(), rng.for_context("deck/1/2").seed());
    }

    /// Derived seeds are pinned so a hasher change shows up as a failure.
    #[cfg(all(target_endian = "little", target_pointer_width = "64"))]
    #[test]
    fn test_context_seed_pinned() {
        assert_eq!(GameRng::new(42).for_context("deck/1/1").seed(), 14_593_734_479_709_190_669);
        assert_eq!(GameRng::new(42).for_context("deck/1/2").seed(), 16_042_189_620_684_744_037);
        assert_eq!(GameRng::new(7).for_context("deck/3/1").seed(), 17_560_620_198_419_622_667);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (1..=10).collect();
        let original = data.clone();

        rng.shuffle(&mut data);

        // Same elements, different order (very likely)
        assert_ne!(data, original);
        data.sort_unstable();
        assert_eq!(data, original);
    }

    #[test]
    fn test_shuffle_short_slices() {
        let mut rng = GameRng::new(7);
        let mut empty: Vec<u8> = Vec::new();
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![9];
        rng.shuffle(&mut single);
        assert_eq!(single, vec![9]);
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = GameRng::new(3);
        let mut picked = rng.sample_indices(50, 20);
        assert_eq!(picked.len(), 20);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 20);
        assert!(picked.iter().all(|&i| i < 50));
    }

    #[test]
    fn test_sample_indices_clamps_to_len() {
        let mut rng = GameRng::new(3);
        let mut picked = rng.sample_indices(5, 8);
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffle_positions_unbiased() {
        // Every starting element should land in slot 0 roughly 1/4 of the time.
        let mut rng = GameRng::new(11);
        let mut counts = [0u32; 4];
        for _ in 0..4000 {
            let mut data = [0usize, 1, 2, 3];
            rng.shuffle(&mut data);
            counts[data[0]] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "biased count {count}");
        }
    }
}
