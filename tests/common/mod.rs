#![allow(dead_code)]

use netsim::VariateGenerator;

/// Seeds used by the statistical tests
pub const SEEDS: [u64; 3] = [7, 42, 12345];

pub fn variates(seed: u64) -> VariateGenerator {
    VariateGenerator::new(seed)
}

/// Relative distance of `value` from `expected`
pub fn relative_error(value: f64, expected: f64) -> f64 {
    (value - expected).abs() / expected.abs()
}
