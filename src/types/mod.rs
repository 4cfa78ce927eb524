use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

pub mod constants;

/// Errors raised by the simulation core.
///
/// None of these are transient: the same inputs always produce the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),
    #[error("Attempted to extract an event from an empty scheduler")]
    EmptyScheduler,
    #[error("Ratio undefined: no {0} were recorded")]
    DivisionUndefined(&'static str),
}

/// The kind of a scheduled event
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A packet arrives at the buffer
    Arrival,
    /// A packet finishes service and leaves the buffer
    Departure,
    /// An observer samples the buffer occupancy
    Observation,
}

/// An event at a point in simulated time (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// When this event happens
    pub time: f64,
    /// What happens
    pub kind: EventKind,
}

impl Event {
    pub fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn arrival(time: f64) -> Self {
        Self::new(time, EventKind::Arrival)
    }

    pub fn departure(time: f64) -> Self {
        Self::new(time, EventKind::Departure)
    }

    pub fn observation(time: f64) -> Self {
        Self::new(time, EventKind::Observation)
    }

    /// Compares two events by time only. Callers must keep insertion order for ties.
    pub fn cmp_time(&self, other: &Self) -> Ordering {
        self.time.total_cmp(&other.time)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "Arrival"),
            EventKind::Departure => write!(f, "Departure"),
            EventKind::Observation => write!(f, "Observation"),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:.9}", self.kind, self.time)
    }
}

/// Rejects a parameter that must be a finite, strictly positive number.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimulationError::ConfigurationError(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}
