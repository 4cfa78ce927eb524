// Node-count sweeps of the shared bus.
//
// For each configured arrival rate the node count is swept and efficiency,
// throughput and the time of the last delivery are reported.

use super::sweep_runner::{SweepPoint, SweepRunner};
use crate::config::{Config, ConfigError};
use netsim::{run_bus_simulation, BusResults, SensingPolicy};

pub const PERSISTENT_SCENARIO_DIR: &str = "sim_sweep_persistent_bus";
pub const NON_PERSISTENT_SCENARIO_DIR: &str = "sim_sweep_non_persistent_bus";

pub type BusSweep = Vec<SweepPoint<usize, BusResults>>;

pub fn scenario_dir(policy: SensingPolicy) -> &'static str {
    match policy {
        SensingPolicy::Persistent => PERSISTENT_SCENARIO_DIR,
        SensingPolicy::NonPersistent => NON_PERSISTENT_SCENARIO_DIR,
    }
}

fn policy_name(policy: SensingPolicy) -> &'static str {
    match policy {
        SensingPolicy::Persistent => "Persistent",
        SensingPolicy::NonPersistent => "Non-Persistent",
    }
}

/// Runs one node-count sweep per configured arrival rate
pub async fn run_sweep_bus(config: &Config, policy: SensingPolicy) -> Result<Vec<(f64, BusSweep)>, ConfigError> {
    let node_counts = config.bus.nodes.values();
    let mut sweeps = Vec::with_capacity(config.bus.arrival_rates.len());
    for &arrival_rate in &config.bus.arrival_rates {
        let template = config.clone();
        let runner = SweepRunner::new(
            &format!("{} Bus A={}", policy_name(policy), arrival_rate),
            &config.scenario_dir(&format!("{}/a_{}", scenario_dir(policy), arrival_rate)),
            "node_count",
            node_counts.clone(),
            config.simulation.seed,
            move |node_count, mut variates| {
                run_bus_simulation(&template.bus_parameters(*node_count, arrival_rate, policy), &mut variates)
            },
        )
        .with_max_in_flight(config.max_in_flight());
        let points = runner.run().await?;
        println!("A = {}", arrival_rate);
        println!("N,Efficiency,Throughput(Mbps),End Time(s)");
        for point in &points {
            println!(
                "{},{:.6},{:.6},{:.6}",
                point.parameter, point.results.efficiency, point.results.throughput_mbps, point.results.elapsed_time
            );
        }
        sweeps.push((arrival_rate, points));
    }
    Ok(sweeps)
}
