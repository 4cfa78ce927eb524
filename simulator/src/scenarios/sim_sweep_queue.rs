// Utilization sweeps of the single-server queue.
//
// The infinite buffer sweep reports E[N] and P(IDLE) per rho. The finite
// buffer sweep repeats the rho range for every configured capacity and adds
// P(LOSS). The finite rho range is a list of bands, each with its own step.

use super::sweep_runner::{SweepPoint, SweepRunner};
use crate::config::{Config, ConfigError};
use netsim::{run_queue_simulation, QueueResults};

pub const INFINITE_SCENARIO_DIR: &str = "sim_sweep_infinite_queue";
pub const FINITE_SCENARIO_DIR: &str = "sim_sweep_finite_queue";

pub type QueueSweep = Vec<SweepPoint<f64, QueueResults>>;

pub async fn run_sweep_infinite_queue(config: &Config) -> Result<QueueSweep, ConfigError> {
    let rho_values = config.queue.infinite_rho.values();
    let template = config.clone();
    let runner = SweepRunner::new(
        "Infinite Queue",
        &config.scenario_dir(INFINITE_SCENARIO_DIR),
        "rho",
        rho_values,
        config.simulation.seed,
        move |rho, mut variates| run_queue_simulation(&template.queue_parameters(*rho, None), &mut variates),
    )
    .with_max_in_flight(config.max_in_flight());
    let points = runner.run().await?;
    print_table(&points, false);
    Ok(points)
}

/// Runs one rho sweep per configured capacity
pub async fn run_sweep_finite_queue(config: &Config) -> Result<Vec<(usize, QueueSweep)>, ConfigError> {
    let rho_values = config.finite_rho_values();
    let mut sweeps = Vec::with_capacity(config.queue.capacities.len());
    for &capacity in &config.queue.capacities {
        let template = config.clone();
        let runner = SweepRunner::new(
            &format!("Finite Queue K={}", capacity),
            &config.scenario_dir(&format!("{}/k_{}", FINITE_SCENARIO_DIR, capacity)),
            "rho",
            rho_values.clone(),
            config.simulation.seed,
            move |rho, mut variates| {
                run_queue_simulation(&template.queue_parameters(*rho, Some(capacity)), &mut variates)
            },
        )
        .with_max_in_flight(config.max_in_flight());
        let points = runner.run().await?;
        println!("K = {}", capacity);
        print_table(&points, true);
        sweeps.push((capacity, points));
    }
    Ok(sweeps)
}

fn print_table(points: &[SweepPoint<f64, QueueResults>], finite: bool) {
    if finite {
        println!("Rho,E[N],P(IDLE),P(LOSS)");
    } else {
        println!("Rho,E[N],P(IDLE)");
    }
    for point in points {
        let results = &point.results;
        match results.p_loss {
            Some(p_loss) if finite => println!(
                "{},{:.6},{:.6},{:.6}",
                point.parameter, results.mean_occupancy, results.p_idle, p_loss
            ),
            _ => println!("{},{:.6},{:.6}", point.parameter, results.mean_occupancy, results.p_idle),
        }
    }
}
