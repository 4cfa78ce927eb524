//! Shared-bus multiple access with collision detection (CSMA/CD).
//!
//! `N` equally spaced nodes share one bus. A node transmits its head packet at
//! the scheduled start time; nodes that start before the signal reaches them
//! collide, nodes that start while the signal is passing them sense the bus
//! busy and defer according to the [`SensingPolicy`].

use crate::{
    types::{
        constants::{
            BUS_CHANNEL_RATE_BPS, BUS_INTER_NODE_DISTANCE_M, BUS_MAX_RETRIES, BUS_PACKET_LENGTH_BITS,
            BUS_PROPAGATION_SPEED_MPS, BUS_SLOT_BITS,
        },
        require_positive, SimulationError,
    },
    variate::VariateGenerator,
};
use serde::{Deserialize, Serialize};

pub mod backoff;
pub mod contention;
pub mod node;

pub use contention::{BusSimulation, StepOutcome};
pub use node::{Completion, Node, Packet, PacketState};

#[cfg(test)]
mod tests;

/// What a node does when it senses the bus busy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensingPolicy {
    /// Keep sensing and transmit as soon as the bus goes idle
    Persistent,
    /// Wait a random backoff and sense again
    NonPersistent,
}

/// Parameters of one bus run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusParameters {
    pub node_count: usize,
    /// Packet arrival rate at each node (packets per second)
    pub arrival_rate: f64,
    /// No packet arrives after this time (seconds)
    pub horizon: f64,
    pub sensing_policy: SensingPolicy,
    /// Bus speed in bits per second
    pub channel_rate: f64,
    /// Packet length in bits
    pub packet_length: f64,
    /// Distance between adjacent nodes in metres
    pub inter_node_distance: f64,
    /// Signal speed in metres per second
    pub propagation_speed: f64,
    /// Failed attempts tolerated before dropping a packet
    pub max_retries: u32,
    /// Backoff slot in bit times
    pub slot_bits: f64,
}

/// Estimates produced by one bus run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusResults {
    /// Successful transmissions over all transmission attempts
    pub efficiency: f64,
    /// Delivered megabits per second of simulated time
    pub throughput_mbps: f64,
    /// End of the last successful transmission (seconds)
    pub elapsed_time: f64,
    pub success_count: u64,
    pub attempt_count: u64,
    pub collision_episodes: u64,
    pub dropped_count: u64,
}

impl BusParameters {
    /// Parameters with the default 1 Mbps bus, 1500 bit packets and nodes 10 m apart
    pub fn new(node_count: usize, arrival_rate: f64, horizon: f64, persistent: bool) -> Self {
        Self {
            node_count,
            arrival_rate,
            horizon,
            sensing_policy: if persistent {
                SensingPolicy::Persistent
            } else {
                SensingPolicy::NonPersistent
            },
            channel_rate: BUS_CHANNEL_RATE_BPS,
            packet_length: BUS_PACKET_LENGTH_BITS,
            inter_node_distance: BUS_INTER_NODE_DISTANCE_M,
            propagation_speed: BUS_PROPAGATION_SPEED_MPS,
            max_retries: BUS_MAX_RETRIES,
            slot_bits: BUS_SLOT_BITS,
        }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.node_count == 0 {
            return Err(SimulationError::ConfigurationError("Node count must be positive".into()));
        }
        require_positive("arrival rate", self.arrival_rate)?;
        require_positive("horizon", self.horizon)?;
        require_positive("channel rate", self.channel_rate)?;
        require_positive("packet length", self.packet_length)?;
        require_positive("propagation speed", self.propagation_speed)?;
        require_positive("slot bits", self.slot_bits)?;
        if self.max_retries > backoff::MAX_BACKOFF_EXPONENT {
            return Err(SimulationError::ConfigurationError(format!(
                "Retry cap must be at most {}, got {}",
                backoff::MAX_BACKOFF_EXPONENT,
                self.max_retries
            )));
        }
        if !self.inter_node_distance.is_finite() || self.inter_node_distance < 0.0 {
            return Err(SimulationError::ConfigurationError(
                "Inter-node distance must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Time to put one packet on the bus
    pub fn transmission_delay(&self) -> f64 {
        self.packet_length / self.channel_rate
    }

    /// Signal travel time between nodes `a` and `b`
    pub fn propagation_delay(&self, a: usize, b: usize) -> f64 {
        a.abs_diff(b) as f64 * self.inter_node_distance / self.propagation_speed
    }

    pub fn slot_duration(&self) -> f64 {
        self.slot_bits / self.channel_rate
    }
}

/// Runs one bus simulation until every node has drained its packets.
///
/// Parameters are validated before any variate is drawn.
pub fn run_bus_simulation(
    params: &BusParameters,
    variates: &mut VariateGenerator,
) -> Result<BusResults, SimulationError> {
    let mut simulation = BusSimulation::new(params.clone(), variates)?;
    simulation.run()?;
    simulation.finish()
}
