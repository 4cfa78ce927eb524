use super::{
    backoff::backoff,
    node::{Completion, Node, Packet, PacketState},
    BusParameters, BusResults, SensingPolicy,
};
use crate::{types::SimulationError, utils::logging, variate::VariateGenerator};
use serde::Serialize;

/// What happened during one step of the bus simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StepOutcome {
    /// The head packet of `node` went through
    Transmitted { node: usize, start: f64, end: f64 },
    /// `nodes` collided; the transmitting node is listed last
    Collision { nodes: Vec<usize>, detected_at: f64 },
}

/// State of a running bus simulation.
///
/// Each [`step`](BusSimulation::step) picks the node whose head packet starts
/// earliest and resolves its transmission against every other node.
pub struct BusSimulation<'a> {
    params: BusParameters,
    variates: &'a mut VariateGenerator,
    nodes: Vec<Node>,
    success_count: u64,
    attempt_count: u64,
    collision_episodes: u64,
    dropped_count: u64,
    /// End of the last successful transmission
    end_time: f64,
}

impl<'a> BusSimulation<'a> {
    /// Validates `params` and gives every node its first packet
    pub fn new(params: BusParameters, variates: &'a mut VariateGenerator) -> Result<Self, SimulationError> {
        params.validate()?;
        let mut simulation = Self {
            nodes: Vec::with_capacity(params.node_count),
            params,
            variates,
            success_count: 0,
            attempt_count: 0,
            collision_episodes: 0,
            dropped_count: 0,
            end_time: 0.0,
        };
        for index in 0..simulation.params.node_count {
            let head = simulation.next_packet(0.0, 0.0)?;
            simulation.nodes.push(Node::new(index, head));
        }
        Ok(simulation)
    }

    /// Starts from hand-built nodes instead of freshly generated packets
    #[cfg(test)]
    pub(crate) fn from_nodes(
        params: BusParameters,
        variates: &'a mut VariateGenerator,
        nodes: Vec<Node>,
    ) -> Result<Self, SimulationError> {
        let mut simulation = Self::new(params, variates)?;
        simulation.nodes = nodes;
        Ok(simulation)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn params(&self) -> &BusParameters {
        &self.params
    }

    /// True once no node has a packet left
    pub fn is_finished(&self) -> bool {
        self.nodes.iter().all(Node::is_empty)
    }

    /// Steps until every node is empty
    pub fn run(&mut self) -> Result<(), SimulationError> {
        while !self.is_finished() {
            self.step()?;
        }
        logging::log(
            "BUS",
            &format!(
                "N={} A={} {:?}: {} delivered, {} attempts, {} dropped, done at {:.6}s",
                self.params.node_count,
                self.params.arrival_rate,
                self.params.sensing_policy,
                self.success_count,
                self.attempt_count,
                self.dropped_count,
                self.end_time
            ),
        );
        Ok(())
    }

    /// Resolves the next transmission attempt on the bus
    pub fn step(&mut self) -> Result<StepOutcome, SimulationError> {
        let transmitter = self.select_transmitter().ok_or(SimulationError::EmptyScheduler)?;
        let start = self.nodes[transmitter]
            .start_time()
            .ok_or(SimulationError::EmptyScheduler)?;
        let end = start + self.params.transmission_delay();
        self.attempt_count += 1;
        if let Some(packet) = self.nodes[transmitter].head.as_mut() {
            // The transmitter sensed the bus idle
            packet.channel_busy_count = 0;
        }

        let mut colliders = Vec::new();
        let mut detected_at = f64::INFINITY;
        for i in 0..self.nodes.len() {
            if i == transmitter {
                continue;
            }
            let Some(other_start) = self.nodes[i].start_time() else {
                continue;
            };
            let propagation = self.params.propagation_delay(transmitter, i);
            if other_start > start + propagation {
                if other_start < end + propagation {
                    self.defer(i, end + propagation)?;
                }
            } else {
                // Node i started before the transmitter's signal reached it
                colliders.push(i);
                self.attempt_count += 1;
                if let Some(packet) = self.nodes[i].head.as_mut() {
                    packet.channel_busy_count = 0;
                }
                detected_at = detected_at.min(other_start + propagation);
            }
        }

        if colliders.is_empty() {
            self.success_count += 1;
            self.end_time = end;
            self.vacate(transmitter, Completion::Transmitted, end)?;
            if logging::enabled() {
                logging::log("BUS", &format!("Node {} transmitted [{:.9}, {:.9}]", transmitter, start, end));
            }
            return Ok(StepOutcome::Transmitted {
                node: transmitter,
                start,
                end,
            });
        }

        colliders.push(transmitter);
        self.collision_episodes += 1;
        for &i in &colliders {
            let resume_at = detected_at + self.params.propagation_delay(i, transmitter);
            self.after_collision(i, resume_at)?;
        }
        if logging::enabled() {
            logging::log(
                "BUS",
                &format!("Collision of nodes {:?} detected at {:.9}", colliders, detected_at),
            );
        }
        Ok(StepOutcome::Collision {
            nodes: colliders,
            detected_at,
        })
    }

    /// Turns the counters into estimates
    pub fn finish(self) -> Result<BusResults, SimulationError> {
        if self.attempt_count == 0 {
            return Err(SimulationError::DivisionUndefined("transmission attempts"));
        }
        let efficiency = self.success_count as f64 / self.attempt_count as f64;
        let throughput_mbps = if self.end_time > 0.0 {
            self.success_count as f64 * self.params.packet_length / (1_000_000.0 * self.end_time)
        } else {
            0.0
        };
        Ok(BusResults {
            efficiency,
            throughput_mbps,
            elapsed_time: self.end_time,
            success_count: self.success_count,
            attempt_count: self.attempt_count,
            collision_episodes: self.collision_episodes,
            dropped_count: self.dropped_count,
        })
    }

    /// Node with the earliest head start time; ties go to the lowest index
    fn select_transmitter(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for node in &self.nodes {
            if let Some(start) = node.start_time() {
                if best.map_or(true, |(_, earliest)| start < earliest) {
                    best = Some((node.index, start));
                }
            }
        }
        best.map(|(index, _)| index)
    }

    /// Moves node `i`'s attempt out of a busy window ending at `busy_until`
    fn defer(&mut self, i: usize, busy_until: f64) -> Result<(), SimulationError> {
        match self.params.sensing_policy {
            SensingPolicy::Persistent => {
                if let Some(packet) = self.nodes[i].head.as_mut() {
                    packet.transmission_start_time = busy_until;
                    packet.state = PacketState::Deferred;
                }
            }
            SensingPolicy::NonPersistent => loop {
                let (sensed_at, busy_count) = match self.nodes[i].head.as_mut() {
                    Some(packet) if packet.transmission_start_time < busy_until => {
                        packet.channel_busy_count += 1;
                        (packet.transmission_start_time, packet.channel_busy_count)
                    }
                    _ => break,
                };
                if busy_count > self.params.max_retries {
                    // The replacement packet is checked against the same busy window
                    self.vacate(i, Completion::Dropped, sensed_at)?;
                    continue;
                }
                let wait = backoff(self.variates, busy_count, self.params.slot_duration());
                if let Some(packet) = self.nodes[i].head.as_mut() {
                    packet.transmission_start_time += wait;
                    packet.state = PacketState::Deferred;
                }
            },
        }
        Ok(())
    }

    /// Backs off or drops node `i`'s head packet after a collision
    fn after_collision(&mut self, i: usize, resume_at: f64) -> Result<(), SimulationError> {
        let collisions = match self.nodes[i].head.as_mut() {
            Some(packet) => {
                packet.collision_count += 1;
                packet.collision_count
            }
            None => return Ok(()),
        };
        if collisions > self.params.max_retries {
            return self.vacate(i, Completion::Dropped, resume_at);
        }
        let wait = backoff(self.variates, collisions, self.params.slot_duration());
        if let Some(packet) = self.nodes[i].head.as_mut() {
            packet.transmission_start_time = resume_at + wait;
            packet.state = PacketState::Backoff;
        }
        Ok(())
    }

    /// Removes node `i`'s head packet and generates the next one
    fn vacate(&mut self, i: usize, completion: Completion, completed_at: f64) -> Result<(), SimulationError> {
        let Some(previous) = self.nodes[i].head.as_ref() else {
            return Ok(());
        };
        let previous_arrival = previous.arrival_time;
        if completion == Completion::Dropped {
            self.dropped_count += 1;
        }
        let next = self.next_packet(previous_arrival, completed_at)?;
        self.nodes[i].replace_head(completion, next);
        Ok(())
    }

    /// Next packet arriving after `previous_arrival`, or `None` past the horizon.
    ///
    /// A packet that arrives while its predecessor is still being handled
    /// cannot start before `completed_at`.
    fn next_packet(&mut self, previous_arrival: f64, completed_at: f64) -> Result<Option<Packet>, SimulationError> {
        let arrival = previous_arrival + self.variates.exponential(self.params.arrival_rate)?;
        if arrival > self.params.horizon {
            return Ok(None);
        }
        Ok(Some(Packet::new(arrival, arrival.max(completed_at))))
    }
}
