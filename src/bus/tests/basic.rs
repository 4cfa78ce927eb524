use crate::{
    bus::{
        backoff::{backoff, max_backoff, MAX_BACKOFF_EXPONENT},
        run_bus_simulation, BusParameters, BusSimulation, SensingPolicy,
    },
    types::SimulationError,
    variate::VariateGenerator,
};

#[test]
fn test_default_link_constants() {
    let params = BusParameters::new(4, 5.0, 10.0, true);
    assert_eq!(params.sensing_policy, SensingPolicy::Persistent);
    assert!((params.transmission_delay() - 0.0015).abs() < 1e-15);
    assert!((params.propagation_delay(0, 1) - 5e-8).abs() < 1e-20);
    assert_eq!(params.propagation_delay(3, 1), params.propagation_delay(1, 3));
    assert_eq!(params.propagation_delay(2, 2), 0.0);
    assert!((params.slot_duration() - 512e-6).abs() < 1e-15);
    assert_eq!(BusParameters::new(4, 5.0, 10.0, false).sensing_policy, SensingPolicy::NonPersistent);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let mut variates = VariateGenerator::new(1);
    let invalid = [
        BusParameters::new(0, 5.0, 10.0, true),
        BusParameters::new(4, 0.0, 10.0, true),
        BusParameters::new(4, -5.0, 10.0, false),
        BusParameters::new(4, 5.0, 0.0, true),
        BusParameters::new(4, 5.0, f64::NAN, true),
    ];
    for params in invalid {
        let result = run_bus_simulation(&params, &mut variates);
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))), "{:?}", params);
    }
}

#[test]
fn test_retry_cap_bounded_by_backoff_exponent() {
    let mut params = BusParameters::new(4, 5.0, 10.0, true);
    params.max_retries = MAX_BACKOFF_EXPONENT;
    assert!(params.validate().is_ok());

    params.max_retries = MAX_BACKOFF_EXPONENT + 1;
    assert!(matches!(params.validate(), Err(SimulationError::ConfigurationError(_))));
    params.max_retries = u32::MAX;
    assert!(matches!(params.validate(), Err(SimulationError::ConfigurationError(_))));

    // Large attempt numbers never wrap into a negative exponent
    let slot = 512e-6;
    assert_eq!(max_backoff(u32::MAX, slot), max_backoff(MAX_BACKOFF_EXPONENT, slot));
    assert!(max_backoff(u32::MAX, slot) > max_backoff(MAX_BACKOFF_EXPONENT - 1, slot));
}

/// Backoff after the k-th failure stays within [0, slot * (2^k - 1)]
#[test]
fn test_backoff_bounds() {
    let mut variates = VariateGenerator::new(8);
    let slot = 512e-6;
    for k in 1..=10 {
        let limit = max_backoff(k, slot);
        assert!((limit - slot * ((1u64 << k) - 1) as f64).abs() < 1e-12);
        for _ in 0..500 {
            let wait = backoff(&mut variates, k, slot);
            assert!(wait >= 0.0 && wait <= limit, "k={} wait={} limit={}", k, wait, limit);
        }
    }
}

/// A lone node never collides, so every attempt succeeds
#[test]
fn test_single_node_is_fully_efficient() {
    for persistent in [true, false] {
        let mut variates = VariateGenerator::new(21);
        let results = run_bus_simulation(&BusParameters::new(1, 5.0, 100.0, persistent), &mut variates).unwrap();
        assert_eq!(results.collision_episodes, 0);
        assert_eq!(results.dropped_count, 0);
        assert_eq!(results.efficiency, 1.0);
        assert_eq!(results.success_count, results.attempt_count);
        assert!(results.success_count > 0);
    }
}

#[test]
fn test_no_packets_is_division_undefined() {
    // Mean first arrival is 1 s, far beyond the horizon
    let mut variates = VariateGenerator::new(4);
    let params = BusParameters::new(1, 1.0, 1e-12, true);
    assert_eq!(
        run_bus_simulation(&params, &mut variates),
        Err(SimulationError::DivisionUndefined("transmission attempts"))
    );
}

#[test]
fn test_stepping_a_finished_run_is_empty_scheduler() {
    let mut variates = VariateGenerator::new(6);
    let mut simulation = BusSimulation::new(BusParameters::new(3, 5.0, 1.0, true), &mut variates).unwrap();
    simulation.run().unwrap();
    assert!(simulation.is_finished());
    assert_eq!(simulation.step(), Err(SimulationError::EmptyScheduler));
}

/// No live packet ever carries more collisions than the retry cap
#[test]
fn test_collision_counters_respect_retry_cap() {
    for persistent in [true, false] {
        let mut variates = VariateGenerator::new(33);
        let params = BusParameters::new(60, 100.0, 0.5, persistent);
        let max_retries = params.max_retries;
        let mut simulation = BusSimulation::new(params, &mut variates).unwrap();
        while !simulation.is_finished() {
            simulation.step().unwrap();
            for node in simulation.nodes() {
                assert!(node.collision_count() <= max_retries);
                assert!(node.channel_busy_count() <= max_retries);
            }
        }
        let results = simulation.finish().unwrap();
        assert!(results.dropped_count > 0, "overload should force drops");
        assert!(results.efficiency > 0.0 && results.efficiency < 1.0);
    }
}

#[test]
fn test_same_seed_reproduces_results() {
    let params = BusParameters::new(10, 10.0, 5.0, false);
    let first = run_bus_simulation(&params, &mut VariateGenerator::new(12)).unwrap();
    let second = run_bus_simulation(&params, &mut VariateGenerator::new(12)).unwrap();
    assert_eq!(first, second);
}
