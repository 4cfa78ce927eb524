mod common;

use common::{relative_error, variates, SEEDS};
use netsim::{run_queue_simulation, QueueParameters};

/// Half-loaded infinite buffer is idle about half the time
#[test]
fn test_infinite_buffer_idle_probability() {
    println!("\n=== Starting test_infinite_buffer_idle_probability ===");
    let params = QueueParameters::new(0.5, None, 1000.0);
    let results = run_queue_simulation(&params, &mut variates(SEEDS[0])).expect("Simulation failed");
    println!("[TEST]   E[N]={:.4} P(IDLE)={:.4}", results.mean_occupancy, results.p_idle);

    assert!((results.p_idle - 0.5).abs() < 0.03, "p_idle {}", results.p_idle);
    assert!(relative_error(results.mean_occupancy, 1.0) < 0.1);
    assert_eq!(results.p_loss, None);
    println!("=== Test completed successfully ===\n");
}

/// E[N] approaches rho / (1 - rho) for a stable infinite buffer
#[test]
fn test_infinite_buffer_mean_occupancy_matches_theory() {
    for rho in [0.25, 0.5, 0.75] {
        let expected = rho / (1.0 - rho);
        let mean: f64 = SEEDS
            .iter()
            .map(|seed| {
                run_queue_simulation(&QueueParameters::new(rho, None, 200.0), &mut variates(*seed))
                    .expect("Simulation failed")
                    .mean_occupancy
            })
            .sum::<f64>()
            / SEEDS.len() as f64;
        println!("[TEST]   rho={} E[N]={:.4} expected={:.4}", rho, mean, expected);
        assert!(relative_error(mean, expected) < 0.1, "rho {}: E[N] {} vs {}", rho, mean, expected);
    }
}

/// With a large buffer the finite model behaves like the infinite one
#[test]
fn test_large_finite_buffer_matches_infinite() {
    let rho = 0.5;
    let finite = run_queue_simulation(&QueueParameters::new(rho, Some(100), 200.0), &mut variates(SEEDS[1]))
        .expect("Simulation failed");
    assert_eq!(finite.dropped_count, 0);
    assert_eq!(finite.p_loss, Some(0.0));
    assert!((finite.p_idle - (1.0 - rho)).abs() < 0.05);
    assert!(relative_error(finite.mean_occupancy, 1.0) < 0.15);
}

/// Above saturation the finite buffer stays nearly full and rarely idle
#[test]
fn test_overloaded_finite_buffer() {
    let capacity = 10;
    let results = run_queue_simulation(&QueueParameters::new(2.0, Some(capacity), 100.0), &mut variates(SEEDS[2]))
        .expect("Simulation failed");
    let p_loss = results.p_loss.expect("finite buffer reports loss");
    // M/M/1/K with rho = 2 and K = 10 loses a little over half the packets
    assert!(p_loss > 0.45 && p_loss < 0.55, "p_loss {}", p_loss);
    assert!(results.p_idle < 0.01);
    assert!(results.mean_occupancy > 8.0 && results.mean_occupancy <= capacity as f64);
    assert!(results.peak_queue_length <= capacity as u64);
}
