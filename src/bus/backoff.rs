//! Truncated binary exponential backoff.

use crate::variate::VariateGenerator;

/// Largest attempt number the backoff window is computed for
pub const MAX_BACKOFF_EXPONENT: u32 = 62;

fn window(k: u32) -> f64 {
    2f64.powi(k.min(MAX_BACKOFF_EXPONENT) as i32) - 1.0
}

/// Largest wait after the `k`-th failed attempt: `slot * (2^k - 1)`.
///
/// `k` is clamped to [`MAX_BACKOFF_EXPONENT`]; parameter validation keeps retry caps below it.
pub fn max_backoff(k: u32, slot_duration: f64) -> f64 {
    slot_duration * window(k)
}

/// Draws the wait after the `k`-th failed attempt, uniform on `[0, max_backoff(k)]`
pub fn backoff(variates: &mut VariateGenerator, k: u32, slot_duration: f64) -> f64 {
    variates.uniform(0.0, window(k)) * slot_duration
}
