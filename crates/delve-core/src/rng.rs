//! Random number generation for level generation
//!
//! Every stage of the pipeline draws from one injected, seeded ChaCha RNG so
//! that a seed fully determines the generated dungeon.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Level generation random number generator
///
/// Wraps ChaCha8Rng for reproducible generation.
#[derive(Debug, Clone)]
pub struct LevelRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl LevelRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `0..n`. Returns 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform integer in `0..span` offset by `low`, for signed grid math.
    ///
    /// Returns `low` when `span <= 0`.
    pub fn offset(&mut self, low: i32, span: i32) -> i32 {
        if span <= 0 {
            return low;
        }
        low + self.rng.gen_range(0..span)
    }

    /// Uniform float in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform float in `[low, low + span)`
    pub fn unit_range(&mut self, low: f64, span: f64) -> f64 {
        low + self.unit() * span
    }

    /// Returns true with the given probability (clamped to `[0, 1]`)
    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability.clamp(0.0, 1.0)
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }
}

impl Default for LevelRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
