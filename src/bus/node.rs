//! Per-node packet bookkeeping.

use serde::Serialize;

/// Where a head-of-line packet is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PacketState {
    /// Waiting for its first transmission attempt
    Scheduled,
    /// Sensed the bus busy and moved its attempt past the busy window
    Deferred,
    /// Collided and is waiting out a random backoff
    Backoff,
}

/// How a packet left its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Completion {
    Transmitted,
    Dropped,
}

/// The packet at the head of a node's queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    /// When the packet arrived at the node
    pub arrival_time: f64,
    /// When the node will next try to put it on the bus
    pub transmission_start_time: f64,
    pub collision_count: u32,
    pub channel_busy_count: u32,
    pub state: PacketState,
}

impl Packet {
    pub fn new(arrival_time: f64, transmission_start_time: f64) -> Self {
        Self {
            arrival_time,
            transmission_start_time,
            collision_count: 0,
            channel_busy_count: 0,
            state: PacketState::Scheduled,
        }
    }
}

/// A station on the bus.
///
/// Only the head packet is materialised; the next one is generated when the
/// head is transmitted or dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub index: usize,
    pub head: Option<Packet>,
    pub transmitted_count: u64,
    pub dropped_count: u64,
}

impl Node {
    pub fn new(index: usize, head: Option<Packet>) -> Self {
        Self {
            index,
            head,
            transmitted_count: 0,
            dropped_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Scheduled start of the head packet's next attempt
    pub fn start_time(&self) -> Option<f64> {
        self.head.as_ref().map(|p| p.transmission_start_time)
    }

    /// Collisions suffered by the current head packet
    pub fn collision_count(&self) -> u32 {
        self.head.as_ref().map_or(0, |p| p.collision_count)
    }

    /// Busy senses of the current head packet since it last sensed the bus idle
    pub fn channel_busy_count(&self) -> u32 {
        self.head.as_ref().map_or(0, |p| p.channel_busy_count)
    }

    /// Records the outcome of the head packet and installs `next` in its place
    pub(crate) fn replace_head(&mut self, completion: Completion, next: Option<Packet>) {
        match completion {
            Completion::Transmitted => self.transmitted_count += 1,
            Completion::Dropped => self.dropped_count += 1,
        }
        self.head = next;
    }
}
