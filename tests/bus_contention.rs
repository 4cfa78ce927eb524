mod common;

use common::variates;
use netsim::{run_bus_simulation, BusParameters};

/// Twenty lightly loaded persistent nodes collide now and then but deliver most packets
#[test]
fn test_persistent_bus_twenty_nodes() {
    println!("\n=== Starting test_persistent_bus_twenty_nodes ===");
    let params = BusParameters::new(20, 5.0, 1000.0, true);
    let results = run_bus_simulation(&params, &mut variates(7)).expect("Simulation failed");
    println!(
        "[TEST]   efficiency={:.4} throughput={:.4} Mbps end={:.3}s",
        results.efficiency, results.throughput_mbps, results.elapsed_time
    );

    assert!(results.efficiency > 0.0 && results.efficiency < 1.0);
    assert!(results.throughput_mbps > 0.0);
    // Offered load is 20 * 5 * 1500 bit/s = 0.15 Mbps
    assert!(results.throughput_mbps > 0.1 && results.throughput_mbps < 0.2);
    assert!(results.elapsed_time > 990.0);
    println!("=== Test completed successfully ===\n");
}

#[test]
fn test_non_persistent_bus_twenty_nodes() {
    let params = BusParameters::new(20, 5.0, 1000.0, false);
    let results = run_bus_simulation(&params, &mut variates(42)).expect("Simulation failed");
    assert!(results.efficiency > 0.0 && results.efficiency < 1.0);
    assert!(results.throughput_mbps > 0.1 && results.throughput_mbps < 0.2);
}

/// Crowding the bus lowers efficiency
#[test]
fn test_efficiency_drops_with_more_nodes() {
    let light = run_bus_simulation(&BusParameters::new(20, 10.0, 20.0, true), &mut variates(1))
        .expect("Simulation failed");
    let heavy = run_bus_simulation(&BusParameters::new(100, 10.0, 20.0, true), &mut variates(1))
        .expect("Simulation failed");
    println!("[TEST]   efficiency N=20: {:.4}, N=100: {:.4}", light.efficiency, heavy.efficiency);
    assert!(heavy.efficiency < light.efficiency);
    assert!(heavy.dropped_count >= light.dropped_count);
}

#[test]
fn test_single_node_bus() {
    let results = run_bus_simulation(&BusParameters::new(1, 20.0, 50.0, true), &mut variates(3))
        .expect("Simulation failed");
    assert_eq!(results.efficiency, 1.0);
    assert_eq!(results.collision_episodes, 0);
}
