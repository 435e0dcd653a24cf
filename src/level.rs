//! Level assignment for newly inserted nodes.
//!
//! Level 1 holds every node. Each further level holds a random subset of
//! the level below it: a node reaching level `k` is promoted to `k + 1`
//! with probability `p`, so level `k` is drawn with probability
//! `p^(k-1) * (1 - p)`, truncated at the maximum level.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{MAX_LEVEL, P};

/// Source of node heights for a skip list.
///
/// Each list owns its generator, so two lists never share random state and
/// tests can seed or script the heights they need.
pub trait LevelGenerator {
    /// Upper bound on any level this generator returns.
    fn max_level(&self) -> usize;

    /// Draw the level of a new node, in `1..=max_level()`.
    fn random_level(&mut self) -> usize;
}

/// Geometric level generator backed by a per-list `StdRng`.
#[derive(Debug, Clone)]
pub struct GeometricLevelGenerator {
    max_level: usize,
    p: f64,
    rng: StdRng,
}

impl GeometricLevelGenerator {
    /// Create a generator seeded from OS entropy.
    ///
    /// # Panics
    /// Panics if `max_level` is 0 or `p` is not in (0, 1).
    pub fn new(max_level: usize, p: f64) -> Self {
        Self::with_rng(max_level, p, StdRng::from_entropy())
    }

    /// Create a reproducible generator from a fixed seed.
    pub fn seeded(max_level: usize, p: f64, seed: u64) -> Self {
        Self::with_rng(max_level, p, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_level: usize, p: f64, rng: StdRng) -> Self {
        assert!(max_level > 0, "max_level must be > 0");
        assert!(p > 0.0 && p < 1.0, "p must be in (0, 1)");
        GeometricLevelGenerator { max_level, p, rng }
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for GeometricLevelGenerator {
    fn default() -> Self {
        Self::new(MAX_LEVEL, P)
    }
}

impl LevelGenerator for GeometricLevelGenerator {
    fn max_level(&self) -> usize {
        self.max_level
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(self.p) {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_within_bounds() {
        let mut generator = GeometricLevelGenerator::seeded(4, 0.9, 1);
        for _ in 0..1000 {
            let level = generator.random_level();
            assert!((1..=4).contains(&level));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = GeometricLevelGenerator::seeded(MAX_LEVEL, P, 42);
        let mut b = GeometricLevelGenerator::seeded(MAX_LEVEL, P, 42);
        let xs: Vec<usize> = (0..256).map(|_| a.random_level()).collect();
        let ys: Vec<usize> = (0..256).map(|_| b.random_level()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_single_level_generator() {
        let mut generator = GeometricLevelGenerator::seeded(1, 0.5, 9);
        assert!((0..100).all(|_| generator.random_level() == 1));
    }

    #[test]
    #[should_panic(expected = "p must be in (0, 1)")]
    fn test_rejects_probability_one() {
        GeometricLevelGenerator::seeded(MAX_LEVEL, 1.0, 0);
    }
}
