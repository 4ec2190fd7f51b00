//! Portable, serializable PRNG used by every stage that owns randomness.
//!
//! infinibatch exposes Python's `random.Random` state directly, which is not
//! portable across implementations. This crate freezes on `ChaCha8Rng`
//! instead: it is a well-audited, fast, counter-based generator whose
//! internal state is `Serialize`/`Deserialize` via `rand_core`'s `serde1`
//! feature, so a checkpoint embeds it verbatim and restores byte-identical
//! replay on any platform.

use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

pub fn new_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Deterministically bump a caller's seed for a derived stage's RNG.
///
/// Preserves the source library's exact convention (`bump_seed(seed, 1)`):
/// a plain `+1`, propagated only when a seed was actually supplied.
pub fn bump_seed(seed: Option<u64>) -> Option<u64> {
    seed.map(|s| s.wrapping_add(1))
}

/// Draw a uniformly distributed integer in `[0, bound)` using Lemire's
/// widening-multiplication method. `bound` must be nonzero.
pub fn uniform_below(rng: &mut ChaCha8Rng, bound: u64) -> u64 {
    debug_assert!(bound > 0);
    let mut m = (rng.next_u64() as u128) * (bound as u128);
    let mut low = m as u64;
    if low < bound {
        let threshold = bound.wrapping_neg() % bound;
        while low < threshold {
            m = (rng.next_u64() as u128) * (bound as u128);
            low = m as u64;
        }
    }
    (m >> 64) as u64
}

/// In-place Fisher-Yates shuffle, matching Python's `random.shuffle`: walk
/// from the end, swapping each position with a uniformly drawn earlier (or
/// equal) position.
pub fn shuffle<T>(rng: &mut ChaCha8Rng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = uniform_below(rng, (i + 1) as u64) as usize;
        items.swap(i, j);
    }
}
