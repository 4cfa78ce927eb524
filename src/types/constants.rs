//! Physical constants of the modelled links.

/// Queue model: average packet length in bits
pub const QUEUE_PACKET_LENGTH_BITS: f64 = 2000.0;

/// Queue model: transmission rate of the output link in bits per second
pub const QUEUE_CHANNEL_CAPACITY_BPS: f64 = 1_000_000.0;

/// Observers sample this many times faster than packets arrive
pub const OBSERVER_OVERSAMPLING: f64 = 5.0;

/// Bus model: speed of the shared bus in bits per second
pub const BUS_CHANNEL_RATE_BPS: f64 = 1_000_000.0;

/// Bus model: fixed packet length in bits
pub const BUS_PACKET_LENGTH_BITS: f64 = 1500.0;

/// Bus model: distance between adjacent nodes in metres
pub const BUS_INTER_NODE_DISTANCE_M: f64 = 10.0;

/// Bus model: signal propagation speed in metres per second
pub const BUS_PROPAGATION_SPEED_MPS: f64 = 2.0e8;

/// Bus model: collisions (or busy senses) tolerated before a packet is dropped
pub const BUS_MAX_RETRIES: u32 = 10;

/// Bus model: backoff slot length in bit times
pub const BUS_SLOT_BITS: f64 = 512.0;
