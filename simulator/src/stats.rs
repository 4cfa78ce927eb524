//! Sample statistics for the variate check.

use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// Statistics
// ------------------------------------------------------------------------------------------------

/// Mean and population variance of a batch of samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStatistics {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
}

impl SampleStatistics {
    /// Returns `None` for an empty batch
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;
        Some(Self { count, mean, variance })
    }

    /// Relative deviation of the mean from `expected`
    pub fn mean_error(&self, expected: f64) -> f64 {
        relative_error(self.mean, expected)
    }

    /// Relative deviation of the variance from `expected`
    pub fn variance_error(&self, expected: f64) -> f64 {
        relative_error(self.variance, expected)
    }
}

pub fn relative_error(value: f64, expected: f64) -> f64 {
    (value - expected).abs() / expected.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_has_no_statistics() {
        assert_eq!(SampleStatistics::from_samples(&[]), None);
    }

    #[test]
    fn test_mean_and_population_variance() {
        let stats = SampleStatistics::from_samples(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.variance - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_relative_errors() {
        let stats = SampleStatistics::from_samples(&[0.9, 1.1]).unwrap();
        assert!(stats.mean_error(1.0) < 1e-12);
        assert!((stats.variance_error(0.02) - 0.5).abs() < 1e-9);
    }
}
