use crate::config::ConfigError;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use netsim::{utils::logging, SimulationError, VariateGenerator};
use serde::Serialize;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Name of the combined report written by every sweep
pub const SWEEP_RESULTS_FILE: &str = "sweep_results.json";

type PointRunner<P, R> = dyn Fn(&P, VariateGenerator) -> Result<R, SimulationError> + Send + Sync;

/// One finished point of a sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint<P, R> {
    pub index: usize,
    pub parameter: P,
    /// Seed of the variate stream this point ran with
    pub seed: u64,
    pub results: R,
}

/// Generic sweep runner shared by every scenario.
///
/// Each parameter value runs on its own blocking task with a variate stream
/// forked from the sweep seed by position, so results do not depend on how
/// the tasks get scheduled. At most `max_in_flight` points run at once; every
/// worker holds a semaphore permit until its simulation returns.
pub struct SweepRunner<P, R> {
    sweep_name: String,
    results_dir: String,
    parameter_name: String,
    parameter_values: Vec<P>,
    seed: u64,
    max_in_flight: usize,
    runner: Arc<PointRunner<P, R>>,
}

/// Number of points a sweep runs at once unless told otherwise
pub fn default_max_in_flight() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

impl<P, R> SweepRunner<P, R>
where
    P: Debug + Clone + Serialize + Send + Sync + 'static,
    R: Serialize + Send + 'static,
{
    pub fn new<F>(
        sweep_name: &str,
        results_dir: &str,
        parameter_name: &str,
        parameter_values: Vec<P>,
        seed: u64,
        runner: F,
    ) -> Self
    where
        F: Fn(&P, VariateGenerator) -> Result<R, SimulationError> + Send + Sync + 'static,
    {
        Self {
            sweep_name: sweep_name.to_string(),
            results_dir: results_dir.to_string(),
            parameter_name: parameter_name.to_string(),
            parameter_values,
            seed,
            max_in_flight: default_max_in_flight(),
            runner: Arc::new(runner),
        }
    }

    /// Caps how many points run at the same time (at least one)
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Runs the complete sweep and saves the combined results
    pub async fn run(&self) -> Result<Vec<SweepPoint<P, R>>, ConfigError> {
        let num_simulations = self.parameter_values.len();
        if num_simulations == 0 {
            return Err(ConfigError::ValidationError(format!(
                "Sweep '{}' has no parameter values",
                self.sweep_name
            )));
        }
        self.create_directories()?;
        self.log_sweep_start();

        println!("Running Sweep: {}", self.sweep_name);
        let progress_bar = self.create_progress_bar(num_simulations);

        let root = VariateGenerator::new(self.seed);
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let handles: Vec<_> = self
            .parameter_values
            .iter()
            .enumerate()
            .map(|(sim_index, param_value)| {
                let runner = Arc::clone(&self.runner);
                let semaphore = Arc::clone(&semaphore);
                let param_value = param_value.clone();
                let variates = root.fork(sim_index as u64);
                let seed = variates.seed();
                let handle = tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await?;
                    let results = tokio::task::spawn_blocking(move || runner(&param_value, variates)).await?;
                    Ok::<_, ConfigError>(results)
                });
                (seed, handle)
            })
            .collect();

        // Collect in parameter order
        let mut all_results = Vec::with_capacity(num_simulations);
        for (sim_index, (seed, handle)) in handles.into_iter().enumerate() {
            let param_value = &self.parameter_values[sim_index];
            self.log_simulation_start(sim_index, num_simulations, param_value);
            let results = handle.await??.map_err(|e| {
                logging::info(
                    "SIMULATOR",
                    &format!(
                        "Sweep '{}' failed during simulation {}/{} with {}: {:?}. Error: {}",
                        self.sweep_name,
                        sim_index + 1,
                        num_simulations,
                        self.parameter_name,
                        param_value,
                        e
                    ),
                );
                ConfigError::Simulation(e)
            })?;
            all_results.push(SweepPoint {
                index: sim_index,
                parameter: param_value.clone(),
                seed,
                results,
            });

            progress_bar.inc(1);
            progress_bar.set_message(self.format_progress_message(sim_index, num_simulations, param_value));
        }
        progress_bar.finish();
        println!("Sweep simulation complete");

        save_sweep_results(
            &self.results_dir,
            &self.sweep_name,
            &self.parameter_name,
            self.seed,
            &all_results,
        )?;

        logging::info("SIMULATOR", &format!("=== Sweep {} Complete ===", self.sweep_name));
        logging::info("SIMULATOR", &format!("Total simulations completed: {}", all_results.len()));
        Ok(all_results)
    }

    /// Creates the necessary directories for the sweep
    fn create_directories(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(Path::new(&self.results_dir).join("data"))?;
        Ok(())
    }

    fn create_progress_bar(&self, num_simulations: usize) -> ProgressBar {
        let progress_bar = ProgressBar::new(num_simulations as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("+>-");
        progress_bar.set_style(style);
        progress_bar
    }

    fn log_sweep_start(&self) {
        logging::info("SIMULATOR", &format!("=== Sweep {} Simulation ===", self.sweep_name));
        logging::info(
            "SIMULATOR",
            &format!("Start Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        );
        logging::info("SIMULATOR", &format!("Number of simulations: {}", self.parameter_values.len()));
        logging::info("SIMULATOR", &format!("Seed: {}", self.seed));
        logging::info("SIMULATOR", &format!("Points in flight: {}", self.max_in_flight));
        logging::info(
            "SIMULATOR",
            &format!("{} values: {:?}", self.parameter_name, self.parameter_values),
        );
        logging::info("SIMULATOR", "================================");
    }

    fn log_simulation_start(&self, sim_index: usize, total_sims: usize, param_value: &P) {
        logging::log(
            "SIMULATOR",
            &format!(
                "Collecting simulation {}/{} with {}: {:?}",
                sim_index + 1,
                total_sims,
                self.parameter_name,
                param_value
            ),
        );
    }

    fn format_progress_message(&self, sim_index: usize, total_sims: usize, param_value: &P) -> String {
        format!(
            "Simulation {}/{} with {}: {:?}",
            sim_index + 1,
            total_sims,
            self.parameter_name,
            param_value
        )
    }
}

/// Writes `<results_dir>/data/sweep_results.json` and returns its path
pub fn save_sweep_results<P: Serialize, R: Serialize>(
    results_dir: &str,
    sweep_name: &str,
    parameter_name: &str,
    seed: u64,
    all_results: &[SweepPoint<P, R>],
) -> Result<PathBuf, ConfigError> {
    let mut sweep_summary = serde_json::Map::new();
    sweep_summary.insert("sweep_name".to_string(), serde_json::to_value(sweep_name)?);
    sweep_summary.insert("num_simulations".to_string(), serde_json::to_value(all_results.len())?);
    sweep_summary.insert("seed".to_string(), serde_json::to_value(seed)?);
    sweep_summary.insert(
        format!("{}_values", parameter_name),
        serde_json::to_value(all_results.iter().map(|point| &point.parameter).collect::<Vec<_>>())?,
    );
    sweep_summary.insert(
        "generated_at".to_string(),
        serde_json::to_value(Local::now().to_rfc3339())?,
    );

    let individual_results = all_results
        .iter()
        .map(|point| -> Result<serde_json::Value, serde_json::Error> {
            let mut json_obj = serde_json::Map::new();
            json_obj.insert("index".to_string(), serde_json::to_value(point.index)?);
            json_obj.insert(parameter_name.to_string(), serde_json::to_value(&point.parameter)?);
            json_obj.insert("seed".to_string(), serde_json::to_value(point.seed)?);
            json_obj.insert("results".to_string(), serde_json::to_value(&point.results)?);
            Ok(serde_json::Value::Object(json_obj))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let combined_results = serde_json::json!({
        "sweep_summary": sweep_summary,
        "individual_results": individual_results,
    });

    let data_dir = Path::new(results_dir).join("data");
    fs::create_dir_all(&data_dir)?;
    let combined_file = data_dir.join(SWEEP_RESULTS_FILE);
    fs::write(&combined_file, serde_json::to_string_pretty(&combined_results)?)?;

    logging::info(
        "SIMULATOR",
        &format!("Saved combined sweep results to {}", combined_file.display()),
    );
    Ok(combined_file)
}

/// Writes a single JSON report to `<results_dir>/data/<file_name>`
pub fn save_report<T: Serialize>(results_dir: &str, file_name: &str, report: &T) -> Result<PathBuf, ConfigError> {
    let data_dir = Path::new(results_dir).join("data");
    fs::create_dir_all(&data_dir)?;
    let path = data_dir.join(file_name);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    logging::info("SIMULATOR", &format!("Saved report to {}", path.display()));
    Ok(path)
}

// ------------------------------------------------------------------------------------------------
// Parameter Sequences
// ------------------------------------------------------------------------------------------------

/// `num_simulations` values starting at `start`, `step` apart.
///
/// Values are rounded to nine decimals so that `0.25 + 0.1 * 3` reads as `0.55`.
pub fn generate_f64_sequence(start: f64, step: f64, num_simulations: usize) -> Vec<f64> {
    (0..num_simulations)
        .map(|i| ((start + step * i as f64) * 1e9).round() / 1e9)
        .collect()
}

pub fn generate_usize_sequence(start: usize, step: usize, num_simulations: usize) -> Vec<usize> {
    (0..num_simulations).map(|i| start + step * i).collect()
}
