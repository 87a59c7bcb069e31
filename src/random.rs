//! Random number helpers shared by the GA.
//!
//! All randomness flows through a single [`StdRng`] owned by the
//! evolution controller, so a fixed seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Shuffles a slice uniformly in place (Fisher–Yates).
pub fn shuffle<T, R: Rng>(slice: &mut [T], rng: &mut R) {
    slice.shuffle(rng);
}
