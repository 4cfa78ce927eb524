use crate::{
    queue::{run_queue_simulation, QueueParameters},
    variate::VariateGenerator,
};

/// Even at heavy overload the system never holds more than K packets
#[test]
fn test_occupancy_never_exceeds_capacity() {
    for (seed, capacity) in [(1, 1), (2, 3), (3, 10)] {
        let mut variates = VariateGenerator::new(seed);
        let params = QueueParameters::new(3.0, Some(capacity), 5.0);
        let results = run_queue_simulation(&params, &mut variates).unwrap();
        assert!(results.peak_queue_length <= capacity as u64);
        // Overload fills the buffer and forces drops
        assert_eq!(results.peak_queue_length, capacity as u64);
        assert!(results.dropped_count > 0);
        assert_eq!(results.generated_count, results.arrival_count + results.dropped_count);
        // Every admitted packet is eventually served
        assert_eq!(results.arrival_count, results.departure_count);
    }
}

#[test]
fn test_loss_is_non_decreasing_in_rho() {
    let mut previous = 0.0;
    for rho in [0.5, 0.8, 1.2, 1.5] {
        let mut variates = VariateGenerator::new(2019);
        let results = run_queue_simulation(&QueueParameters::new(rho, Some(10), 100.0), &mut variates).unwrap();
        let p_loss = results.p_loss.unwrap();
        assert!(p_loss >= previous, "p_loss {} at rho {} dropped below {}", p_loss, rho, previous);
        previous = p_loss;
    }
    // Theory gives about 0.34 at rho = 1.5 with K = 10
    assert!(previous > 0.25 && previous < 0.45);
}

#[test]
fn test_loss_vanishes_with_large_buffer() {
    let rho = 0.8;
    let loss = |capacity: usize| {
        let mut variates = VariateGenerator::new(17);
        run_queue_simulation(&QueueParameters::new(rho, Some(capacity), 100.0), &mut variates)
            .unwrap()
            .p_loss
            .unwrap()
    };
    let small = loss(5);
    let medium = loss(20);
    let large = loss(60);
    assert!(small > medium, "{} should exceed {}", small, medium);
    assert!(medium >= large);
    assert!(large < 0.005, "p_loss {} with K=60", large);
}
