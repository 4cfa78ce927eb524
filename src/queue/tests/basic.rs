use crate::{
    queue::{run_queue_simulation, streams, QueueParameters, QueueState},
    scheduler::SchedulerMode,
    types::SimulationError,
    variate::VariateGenerator,
};

#[test]
fn test_derived_rates() {
    let params = QueueParameters::new(0.5, None, 10.0);
    // 0.5 * 1 Mbps / 2000 bit
    assert!((params.arrival_rate() - 250.0).abs() < 1e-9);
    assert!((params.observer_rate() - 1250.0).abs() < 1e-9);
    assert_eq!(params.scheduler_mode(), SchedulerMode::Eager);
    assert_eq!(QueueParameters::new(0.5, Some(10), 10.0).scheduler_mode(), SchedulerMode::Lazy);
}

/// Invalid parameters are rejected before anything runs
#[test]
fn test_invalid_parameters_are_rejected() {
    let mut variates = VariateGenerator::new(1);
    let invalid = [
        QueueParameters::new(0.0, None, 10.0),
        QueueParameters::new(-0.5, None, 10.0),
        QueueParameters::new(0.5, Some(0), 10.0),
        QueueParameters::new(0.5, None, 0.0),
        QueueParameters::new(0.5, None, -1.0),
        QueueParameters::new(f64::NAN, None, 10.0),
    ];
    for params in invalid {
        let result = run_queue_simulation(&params, &mut variates);
        assert!(
            matches!(result, Err(SimulationError::ConfigurationError(_))),
            "{:?} should be rejected, got {:?}",
            params,
            result
        );
    }
}

/// A horizon far shorter than the mean observation gap yields no observations
#[test]
fn test_zero_observations_is_division_undefined() {
    let mut variates = VariateGenerator::new(5);
    let params = QueueParameters::new(0.5, None, 1e-12);
    assert_eq!(
        run_queue_simulation(&params, &mut variates),
        Err(SimulationError::DivisionUndefined("observations"))
    );
}

#[test]
fn test_poisson_times_stay_within_horizon() {
    let mut variates = VariateGenerator::new(11);
    let times = streams::poisson_times(&mut variates, 100.0, 5.0).unwrap();
    assert!(!times.is_empty());
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert!(times.iter().all(|t| *t > 0.0 && *t <= 5.0));
    // Roughly rate * horizon points
    assert!(times.len() > 400 && times.len() < 600, "got {} points", times.len());
}

#[test]
fn test_fcfs_departures_follow_recurrence() {
    let arrivals = [1.0, 1.5, 4.0];
    let mut services = [2.0, 1.0, 0.5].into_iter();
    let departures = streams::fcfs_departures(&arrivals, || Ok(services.next().unwrap())).unwrap();
    // 1.0 + 2.0, then queued behind it, then server idle until 4.0
    assert_eq!(departures, vec![3.0, 4.0, 4.5]);
}

#[test]
fn test_state_counts_and_occupancy() {
    let mut state = QueueState::new(Some(2));
    state.observe();
    state.admit();
    state.admit();
    assert!(state.is_full());
    state.drop_arrival();
    state.observe();
    state.depart();
    state.observe();

    assert_eq!(state.generated_count, 3);
    assert_eq!(state.dropped_count, 1);
    assert_eq!(state.occupancy_samples, vec![0, 2, 1]);
    assert_eq!(state.peak_queue_length, 2);

    let results = state.into_results().unwrap();
    assert!((results.mean_occupancy - 1.0).abs() < 1e-12);
    assert!((results.p_idle - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(results.p_loss, Some(1.0 / 3.0));
}

#[test]
fn test_schedule_departure_waits_for_previous_packet() {
    let mut state = QueueState::new(Some(5));
    assert_eq!(state.schedule_departure(1.0, 2.0), 3.0);
    assert_eq!(state.schedule_departure(2.0, 1.0), 4.0);
    assert_eq!(state.schedule_departure(10.0, 1.0), 11.0);
}

#[test]
fn test_infinite_buffer_never_drops() {
    let mut variates = VariateGenerator::new(3);
    let results = run_queue_simulation(&QueueParameters::new(1.2, None, 10.0), &mut variates).unwrap();
    assert_eq!(results.p_loss, None);
    assert_eq!(results.dropped_count, 0);
    assert_eq!(results.generated_count, results.arrival_count);
    assert_eq!(results.arrival_count, results.departure_count);
}

#[test]
fn test_same_seed_reproduces_results() {
    let params = QueueParameters::new(0.9, Some(5), 5.0);
    let first = run_queue_simulation(&params, &mut VariateGenerator::new(99)).unwrap();
    let second = run_queue_simulation(&params, &mut VariateGenerator::new(99)).unwrap();
    assert_eq!(first, second);
}
