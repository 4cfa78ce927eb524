use super::QueueResults;
use crate::types::SimulationError;

/// Counters of one queue run.
///
/// `arrival_count` counts admitted packets only; `generated_count` counts
/// every arrival attempt including drops.
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    pub arrival_count: u64,
    pub departure_count: u64,
    pub observation_count: u64,
    pub idle_observation_count: u64,
    pub occupancy_samples: Vec<u64>,
    pub queue_length: u64,
    pub generated_count: u64,
    pub dropped_count: u64,
    pub peak_queue_length: u64,
    /// Time the most recently admitted packet leaves the server
    pub last_departure: f64,
    capacity: Option<u64>,
}

impl QueueState {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.map(|k| k as u64),
            ..Self::default()
        }
    }

    /// Packets currently in the system
    pub fn occupancy(&self) -> u64 {
        self.arrival_count - self.departure_count
    }

    pub fn is_full(&self) -> bool {
        self.capacity.map_or(false, |k| self.queue_length >= k)
    }

    /// Accepts an arriving packet into the buffer
    pub fn admit(&mut self) {
        self.generated_count += 1;
        self.arrival_count += 1;
        self.queue_length += 1;
        self.peak_queue_length = self.peak_queue_length.max(self.queue_length);
        debug_assert!(self.capacity.map_or(true, |k| self.queue_length <= k));
    }

    /// Rejects an arriving packet; the queue length is unchanged
    pub fn drop_arrival(&mut self) {
        self.generated_count += 1;
        self.dropped_count += 1;
    }

    /// Computes when an admitted packet arriving at `arrival` leaves, FCFS
    pub fn schedule_departure(&mut self, arrival: f64, service: f64) -> f64 {
        self.last_departure = arrival.max(self.last_departure) + service;
        self.last_departure
    }

    pub fn depart(&mut self) {
        debug_assert!(self.arrival_count > self.departure_count, "departure without a packet");
        self.departure_count += 1;
        self.queue_length = self.queue_length.saturating_sub(1);
    }

    /// Samples the occupancy without changing it
    pub fn observe(&mut self) {
        let occupancy = self.occupancy();
        self.observation_count += 1;
        self.occupancy_samples.push(occupancy);
        if occupancy == 0 {
            self.idle_observation_count += 1;
        }
    }

    /// Turns the counters into estimates
    pub fn into_results(self) -> Result<QueueResults, SimulationError> {
        if self.observation_count == 0 {
            return Err(SimulationError::DivisionUndefined("observations"));
        }
        let total: u64 = self.occupancy_samples.iter().sum();
        let mean_occupancy = total as f64 / self.occupancy_samples.len() as f64;
        let p_idle = self.idle_observation_count as f64 / self.observation_count as f64;
        let p_loss = match self.capacity {
            None => None,
            Some(_) if self.generated_count == 0 => {
                return Err(SimulationError::DivisionUndefined("generated packets"))
            }
            Some(_) => Some(self.dropped_count as f64 / self.generated_count as f64),
        };

        Ok(QueueResults {
            mean_occupancy,
            p_idle,
            p_loss,
            arrival_count: self.arrival_count,
            departure_count: self.departure_count,
            observation_count: self.observation_count,
            generated_count: self.generated_count,
            dropped_count: self.dropped_count,
            peak_queue_length: self.peak_queue_length,
        })
    }
}
