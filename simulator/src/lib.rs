pub mod config;
pub mod interface;
pub mod logging;
pub mod scenarios;
pub mod stats;

pub use config::{Config, ConfigError, ValidateConfig};
pub use interface::{SimulationType, SimulatorInterface};
pub use scenarios::sweep_runner::{generate_f64_sequence, generate_usize_sequence, SweepPoint, SweepRunner};
pub use stats::SampleStatistics;
