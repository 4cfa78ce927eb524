// Checks the exponential generator against its analytic moments.
//
// Draws a batch at the configured rate and compares the sample mean and
// variance with 1/rate and 1/rate^2.

use super::sweep_runner::save_report;
use crate::config::{Config, ConfigError};
use crate::stats::SampleStatistics;
use netsim::{utils::logging, VariateGenerator};
use serde::Serialize;

pub const SCENARIO_DIR: &str = "variate_check";

#[derive(Debug, Clone, Serialize)]
pub struct VariateCheckReport {
    pub rate: f64,
    pub seed: u64,
    pub expected_mean: f64,
    pub expected_variance: f64,
    pub statistics: SampleStatistics,
    pub mean_error: f64,
    pub variance_error: f64,
}

pub fn run_variate_check(config: &Config) -> Result<VariateCheckReport, ConfigError> {
    let check = &config.variate_check;
    let mut variates = VariateGenerator::new(config.simulation.seed);
    let samples = variates.exponential_batch(check.rate, check.samples)?;
    let statistics = SampleStatistics::from_samples(&samples)
        .ok_or_else(|| ConfigError::ValidationError("Variate check drew no samples".into()))?;

    let expected_mean = 1.0 / check.rate;
    let expected_variance = expected_mean * expected_mean;
    let report = VariateCheckReport {
        rate: check.rate,
        seed: config.simulation.seed,
        expected_mean,
        expected_variance,
        mean_error: statistics.mean_error(expected_mean),
        variance_error: statistics.variance_error(expected_variance),
        statistics,
    };

    println!("Mean: {} (expected {})", report.statistics.mean, expected_mean);
    println!("Variance: {} (expected {})", report.statistics.variance, expected_variance);
    logging::info(
        "SIMULATOR",
        &format!(
            "Variate check at rate {}: mean off by {:.2}%, variance off by {:.2}%",
            check.rate,
            report.mean_error * 100.0,
            report.variance_error * 100.0
        ),
    );

    save_report(&config.scenario_dir(SCENARIO_DIR), "variate_check.json", &report)?;
    Ok(report)
}
