//! Single-server queue with Poisson arrivals and exponential service.
//!
//! Without a capacity the buffer is infinite and every departure can be
//! precomputed, so the run uses an eager scheduler. With a capacity `K` an
//! arrival is only admitted if fewer than `K` packets are present, which is
//! known only while replaying the arrivals; departures are then inserted into a
//! lazy scheduler as packets are admitted.

use crate::{
    scheduler::{build_scheduler, EventScheduler, SchedulerMode},
    types::{
        constants::{OBSERVER_OVERSAMPLING, QUEUE_CHANNEL_CAPACITY_BPS, QUEUE_PACKET_LENGTH_BITS},
        require_positive, Event, EventKind, SimulationError,
    },
    utils::logging,
    variate::VariateGenerator,
};
use serde::{Deserialize, Serialize};

pub mod state;
pub mod streams;

pub use state::QueueState;

#[cfg(test)]
mod tests;

/// Parameters of one queue run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueParameters {
    /// Utilization: offered load over service capacity
    pub rho: f64,
    /// Buffer size in packets (including the one in service); `None` is infinite
    pub capacity: Option<usize>,
    /// Simulated time in seconds
    pub horizon: f64,
    /// Average packet length in bits
    pub packet_length: f64,
    /// Output link rate in bits per second
    pub channel_capacity: f64,
}

/// Estimates produced by one queue run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueResults {
    /// Time-average number of packets in the system, E[N]
    pub mean_occupancy: f64,
    /// Fraction of observations that found the system empty
    pub p_idle: f64,
    /// Fraction of generated packets that were dropped (finite buffer only)
    pub p_loss: Option<f64>,
    pub arrival_count: u64,
    pub departure_count: u64,
    pub observation_count: u64,
    pub generated_count: u64,
    pub dropped_count: u64,
    pub peak_queue_length: u64,
}

impl QueueParameters {
    /// Parameters with the default link (2000 bit packets on a 1 Mbps channel)
    pub fn new(rho: f64, capacity: Option<usize>, horizon: f64) -> Self {
        Self {
            rho,
            capacity,
            horizon,
            packet_length: QUEUE_PACKET_LENGTH_BITS,
            channel_capacity: QUEUE_CHANNEL_CAPACITY_BPS,
        }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        require_positive("rho", self.rho)?;
        require_positive("horizon", self.horizon)?;
        require_positive("packet length", self.packet_length)?;
        require_positive("channel capacity", self.channel_capacity)?;
        if self.capacity == Some(0) {
            return Err(SimulationError::ConfigurationError("Capacity must be positive".into()));
        }
        Ok(())
    }

    /// Packet arrival rate (packets per second)
    pub fn arrival_rate(&self) -> f64 {
        self.rho * self.channel_capacity / self.packet_length
    }

    /// Observation rate (observations per second)
    pub fn observer_rate(&self) -> f64 {
        OBSERVER_OVERSAMPLING * self.arrival_rate()
    }

    /// Which scheduler the model needs
    pub fn scheduler_mode(&self) -> SchedulerMode {
        match self.capacity {
            None => SchedulerMode::Eager,
            Some(_) => SchedulerMode::Lazy,
        }
    }

    /// Draws the service time of one packet in seconds
    pub(crate) fn service_time(&self, variates: &mut VariateGenerator) -> Result<f64, SimulationError> {
        Ok(variates.exponential(1.0 / self.packet_length)? / self.channel_capacity)
    }
}

/// Runs one queue simulation and returns its estimates.
///
/// Parameters are validated before any variate is drawn.
pub fn run_queue_simulation(
    params: &QueueParameters,
    variates: &mut VariateGenerator,
) -> Result<QueueResults, SimulationError> {
    params.validate()?;

    let arrivals = streams::poisson_times(variates, params.arrival_rate(), params.horizon)?;
    let mut events: Vec<Event> = arrivals.iter().copied().map(Event::arrival).collect();
    if params.capacity.is_none() {
        let departures = streams::fcfs_departures(&arrivals, || params.service_time(variates))?;
        events.extend(departures.into_iter().map(Event::departure));
    }
    let observations = streams::poisson_times(variates, params.observer_rate(), params.horizon)?;
    events.extend(observations.into_iter().map(Event::observation));

    if logging::enabled() {
        logging::log(
            "QUEUE",
            &format!(
                "rho={} capacity={:?}: {} arrivals, {} events scheduled up front",
                params.rho,
                params.capacity,
                arrivals.len(),
                events.len()
            ),
        );
    }

    let mut scheduler = build_scheduler(params.scheduler_mode(), events)?;
    let mut state = QueueState::new(params.capacity);
    process_events(params, scheduler.as_mut(), &mut state, variates)?;
    state.into_results()
}

/// Extracts every event in time order and applies it to the queue state
fn process_events(
    params: &QueueParameters,
    scheduler: &mut dyn EventScheduler,
    state: &mut QueueState,
    variates: &mut VariateGenerator,
) -> Result<(), SimulationError> {
    while !scheduler.is_empty() {
        let event = scheduler.extract_earliest()?;
        match event.kind {
            EventKind::Arrival => match params.capacity {
                None => state.admit(),
                Some(_) if state.is_full() => {
                    state.drop_arrival();
                    if logging::enabled() {
                        logging::log("QUEUE", &format!("Dropped packet at {:.6}s", event.time));
                    }
                }
                Some(_) => {
                    state.admit();
                    let service = params.service_time(variates)?;
                    let departure = state.schedule_departure(event.time, service);
                    scheduler.insert(Event::departure(departure))?;
                }
            },
            EventKind::Departure => state.depart(),
            EventKind::Observation => state.observe(),
        }
    }
    Ok(())
}
