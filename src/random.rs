//! Random number generation, built on the "rand" crate with a xoshiro engine

use crate::numeric::Float;
use prefix_num_ops::real::*;
use rand::{Rng, SeedableRng};

// Select random number generation engine in use
#[cfg(feature = "f32")]
type Engine = rand_xoshiro::Xoshiro128Plus;
#[cfg(not(feature = "f32"))]
type Engine = rand_xoshiro::Xoshiro256Plus;

/// Seeded random number generator with the few distributions needed by the
/// toy event generator
#[derive(Clone)]
pub struct RandomGenerator {
    rng: Engine,
}
//
impl RandomGenerator {
    /// Spawn a new random number generator from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Engine::seed_from_u64(seed),
        }
    }

    /// Generate a random floating-point number in [0, 1[
    pub fn random(&mut self) -> Float {
        self.rng.gen()
    }

    /// Generate a random floating-point number in [min, max[
    pub fn uniform(&mut self, min: Float, max: Float) -> Float {
        min + (max - min) * self.random()
    }

    /// Truth with a given probability
    pub fn bernoulli(&mut self, probability: Float) -> bool {
        self.random() < probability
    }

    /// Exponentially distributed number of a given mean
    pub fn exponential(&mut self, mean: Float) -> Float {
        // 1 - random() lies in ]0, 1], which keeps the log finite
        -mean * ln(1. - self.random())
    }

    /// Poisson-distributed integer of a given mean (Knuth's algorithm, which
    /// is fine for the small means used here)
    pub fn poisson(&mut self, mean: Float) -> usize {
        if mean <= 0. {
            return 0;
        }
        let limit = exp(-mean);
        let mut count = 0;
        let mut product = self.random();
        while product > limit {
            count += 1;
            product *= self.random();
        }
        count
    }
}
