//! Configuration loader and validator for the netsim driver.
//! Handles parsing, validation, and access to the sweep configuration file.

use crate::scenarios::sweep_runner::{default_max_in_flight, generate_f64_sequence, generate_usize_sequence};
use netsim::{types::constants, BusParameters, QueueParameters, SensingPolicy, SimulationError};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default location of the configuration file, relative to the workspace root
pub const DEFAULT_CONFIG_PATH: &str = "simulator/config/config.toml";

// ------------------------------------------------------------------------------------------------
// Main Configuration Structs
// ------------------------------------------------------------------------------------------------

/// Everything the driver needs to run the available scenarios.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Seed, horizon and output location shared by all scenarios
    pub simulation: SimulationConfig,
    /// Sanity check of the exponential generator
    pub variate_check: VariateCheckConfig,
    /// Single-server queue sweeps
    pub queue: QueueConfig,
    /// Shared-bus sweeps
    pub bus: BusConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Root seed; every sweep point derives its own stream from it
    pub seed: u64,
    /// Simulated time in seconds
    pub horizon: f64,
    /// Directory that receives one subdirectory per scenario
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    /// Sweep points run at the same time; defaults to the available cores
    #[serde(default)]
    pub max_parallel_simulations: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VariateCheckConfig {
    /// Rate of the exponential distribution under test
    pub rate: f64,
    /// Number of samples to draw
    pub samples: usize,
}

/// An arithmetic progression of `num_simulations` values
#[derive(Debug, Deserialize, Clone)]
pub struct RangeConfig<T> {
    pub start: T,
    pub step: T,
    pub num_simulations: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueueConfig {
    /// Average packet length in bits
    #[serde(default = "default_queue_packet_length")]
    pub packet_length: f64,
    /// Output link speed in bits per second
    #[serde(default = "default_queue_channel_capacity")]
    pub channel_capacity: f64,
    /// Buffer sizes for the finite queue sweep
    pub capacities: Vec<usize>,
    /// Utilizations for the infinite buffer sweep
    pub infinite_rho: RangeConfig<f64>,
    /// Utilization bands for the finite buffer sweep, run in order
    pub finite_rho: Vec<RangeConfig<f64>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusConfig {
    /// Per-node packet arrival rates; one node sweep is run for each
    pub arrival_rates: Vec<f64>,
    /// Node counts to sweep
    pub nodes: RangeConfig<usize>,
    /// Overrides the shared horizon for bus runs
    #[serde(default)]
    pub horizon: Option<f64>,
    /// Include the persistent policy when running everything
    #[serde(default = "default_true")]
    pub persistent: bool,
    /// Include the non-persistent policy when running everything
    #[serde(default = "default_true")]
    pub non_persistent: bool,
}

fn default_results_dir() -> String {
    "simulator/results".to_string()
}

fn default_queue_packet_length() -> f64 {
    constants::QUEUE_PACKET_LENGTH_BITS
}

fn default_queue_channel_capacity() -> f64 {
    constants::QUEUE_CHANNEL_CAPACITY_BPS
}

fn default_true() -> bool {
    true
}

// ------------------------------------------------------------------------------------------------
// Error Types and Validation
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Simulation worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("Simulation worker pool closed: {0}")]
    WorkerPool(#[from] tokio::sync::AcquireError),
}

// Trait for common validation functionality
pub trait ValidateConfig {
    fn validate(&self) -> Result<(), ConfigError>;
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::ValidationError(format!("{} must be positive", name)));
    }
    Ok(())
}

impl RangeConfig<f64> {
    pub fn values(&self) -> Vec<f64> {
        generate_f64_sequence(self.start, self.step, self.num_simulations)
    }

    fn validate_rho(&self, name: &str) -> Result<(), ConfigError> {
        self.validate_count(name)?;
        require_positive(&format!("{} rho start", name), self.start)?;
        if !self.step.is_finite() || self.step < 0.0 {
            return Err(ConfigError::ValidationError(format!("{} rho step must be non-negative", name)));
        }
        Ok(())
    }
}

impl RangeConfig<usize> {
    pub fn values(&self) -> Vec<usize> {
        generate_usize_sequence(self.start, self.step, self.num_simulations)
    }
}

impl<T> RangeConfig<T> {
    fn validate_count(&self, name: &str) -> Result<(), ConfigError> {
        if self.num_simulations == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} sweep needs at least one simulation",
                name
            )));
        }
        Ok(())
    }
}

impl ValidateConfig for SimulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("Simulation horizon", self.horizon)?;
        if self.results_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError("Results directory must not be empty".into()));
        }
        if self.max_parallel_simulations == Some(0) {
            return Err(ConfigError::ValidationError("Parallel simulations must be positive".into()));
        }
        Ok(())
    }
}

impl ValidateConfig for VariateCheckConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("Variate check rate", self.rate)?;
        if self.samples == 0 {
            return Err(ConfigError::ValidationError("Variate check needs at least one sample".into()));
        }
        Ok(())
    }
}

impl ValidateConfig for QueueConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("Queue packet length", self.packet_length)?;
        require_positive("Queue channel capacity", self.channel_capacity)?;
        if self.capacities.is_empty() {
            return Err(ConfigError::ValidationError("At least one buffer capacity is required".into()));
        }
        if self.capacities.contains(&0) {
            return Err(ConfigError::ValidationError("Buffer capacities must be positive".into()));
        }
        self.infinite_rho.validate_rho("Infinite queue")?;
        if self.finite_rho.is_empty() {
            return Err(ConfigError::ValidationError("At least one finite queue rho band is required".into()));
        }
        for band in &self.finite_rho {
            band.validate_rho("Finite queue")?;
        }
        Ok(())
    }
}

impl ValidateConfig for BusConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.arrival_rates.is_empty() {
            return Err(ConfigError::ValidationError("At least one bus arrival rate is required".into()));
        }
        for rate in &self.arrival_rates {
            require_positive("Bus arrival rate", *rate)?;
        }
        self.nodes.validate_count("Bus node")?;
        if self.nodes.start == 0 {
            return Err(ConfigError::ValidationError("Node count must be positive".into()));
        }
        if let Some(horizon) = self.horizon {
            require_positive("Bus horizon", horizon)?;
        }
        Ok(())
    }
}

impl ValidateConfig for Config {
    fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.variate_check.validate()?;
        self.queue.validate()?;
        self.bus.validate()?;
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// Configuration Implementation Methods
// ------------------------------------------------------------------------------------------------

impl Config {
    /// Loads the file named by `NETSIM_CONFIG`, or the default path
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("NETSIM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path)?;
        Self::parse(&config_str)
    }

    pub fn parse(config_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Utilizations of the finite buffer sweep, bands concatenated in order
    pub fn finite_rho_values(&self) -> Vec<f64> {
        self.queue.finite_rho.iter().flat_map(|band| band.values()).collect()
    }

    /// Cap on sweep points running at once
    pub fn max_in_flight(&self) -> usize {
        self.simulation
            .max_parallel_simulations
            .unwrap_or_else(default_max_in_flight)
    }

    /// Directory for the results of one scenario
    pub fn scenario_dir(&self, scenario: &str) -> String {
        format!("{}/{}", self.simulation.results_dir, scenario)
    }

    /// Queue parameters for one sweep point
    pub fn queue_parameters(&self, rho: f64, capacity: Option<usize>) -> QueueParameters {
        QueueParameters {
            packet_length: self.queue.packet_length,
            channel_capacity: self.queue.channel_capacity,
            ..QueueParameters::new(rho, capacity, self.simulation.horizon)
        }
    }

    pub fn bus_horizon(&self) -> f64 {
        self.bus.horizon.unwrap_or(self.simulation.horizon)
    }

    /// Bus parameters for one sweep point
    pub fn bus_parameters(&self, node_count: usize, arrival_rate: f64, policy: SensingPolicy) -> BusParameters {
        BusParameters::new(
            node_count,
            arrival_rate,
            self.bus_horizon(),
            policy == SensingPolicy::Persistent,
        )
    }

    /// Policies to include when every scenario is run
    pub fn enabled_policies(&self) -> Vec<SensingPolicy> {
        let mut policies = Vec::new();
        if self.bus.persistent {
            policies.push(SensingPolicy::Persistent);
        }
        if self.bus.non_persistent {
            policies.push(SensingPolicy::NonPersistent);
        }
        policies
    }
}
