use crate::config::{Config, ConfigError};
use netsim::utils::logging;
use std::time::Instant;

/// Runs every scenario sequentially
pub async fn run_all_tests(config: &Config) -> Result<(), ConfigError> {
    let start_time = Instant::now();

    logging::info("SIMULATOR", "=== Starting All Tests Suite ===");
    logging::info("SIMULATOR", "This will run all simulation types sequentially");

    super::variate_check::run_variate_check(config)?;
    super::sim_sweep_queue::run_sweep_infinite_queue(config).await?;
    super::sim_sweep_queue::run_sweep_finite_queue(config).await?;
    for policy in config.enabled_policies() {
        super::sim_sweep_bus::run_sweep_bus(config, policy).await?;
    }

    let total_time = start_time.elapsed();
    logging::info("SIMULATOR", "=== All Tests Completed Successfully ===");
    logging::info("SIMULATOR", &format!("Total execution time: {:.2?}", total_time));

    println!("All tests completed successfully!");
    println!("Total execution time: {:.2?}", total_time);

    Ok(())
}
