//! Seeded source of the random variates that drive every model.
//!
//! Exponential variates use the inverse transform `-ln(1 - U) / rate` with
//! `U ~ Uniform[0, 1)`, so `1 - U` is never zero.

use crate::types::{require_positive, SimulationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};


/// A seeded generator of exponential and uniform variates.
///
/// Each run owns its generator; generators are never shared between concurrent runs.
#[derive(Debug, Clone)]
pub struct VariateGenerator {
    rng: StdRng,
    seed: u64,
}

impl VariateGenerator {
    /// Creates a generator whose sequence is fully determined by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derives an independent generator for parallel stream `stream`.
    ///
    /// The derived seed only depends on this generator's seed, never on how
    /// many variates have been drawn so far.
    pub fn fork(&self, stream: u64) -> Self {
        // SplitMix64 finaliser spreads neighbouring stream indices apart
        let mut z = self
            .seed
            .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        Self::new(z ^ (z >> 31))
    }

    /// The seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws one exponential variate with the given rate (mean `1 / rate`)
    pub fn exponential(&mut self, rate: f64) -> Result<f64, SimulationError> {
        require_positive("rate", rate)?;
        Ok(self.sample_exponential(rate))
    }

    /// Draws `n` independent exponential variates with the given rate
    pub fn exponential_batch(&mut self, rate: f64, n: usize) -> Result<Vec<f64>, SimulationError> {
        require_positive("rate", rate)?;
        Ok((0..n).map(|_| self.sample_exponential(rate)).collect())
    }

    /// Draws a uniform variate from the closed interval `[low, high]`
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        Uniform::new_inclusive(low, high).sample(&mut self.rng)
    }

    fn sample_exponential(&mut self, rate: f64) -> f64 {
        let u: f64 = self.rng.gen();
        -(1.0 - u).ln() / rate
    }
}
