//! Time-ordered event sets.
//!
//! Two strategies share the [`EventScheduler`] trait:
//! - [`EagerScheduler`] takes every event up front and sorts once. It only fits
//!   models whose future events never depend on decisions taken mid-run.
//! - [`LazyScheduler`] keeps its events sorted at all times and accepts new
//!   events while the run is in progress.
//!
//! Both extract events in non-decreasing time order and break ties by
//! insertion order.

use crate::types::{Event, SimulationError};

pub mod eager;
pub mod lazy;

pub use eager::EagerScheduler;
pub use lazy::LazyScheduler;


/// How a scheduler is built and maintained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerMode {
    /// Generate every event, concatenate and sort once
    Eager,
    /// Keep the set sorted and insert events as they are discovered
    Lazy,
}

/// An ordered set of pending events
pub trait EventScheduler {
    /// Schedules an event
    fn insert(&mut self, event: Event) -> Result<(), SimulationError>;

    /// Removes and returns the earliest pending event
    fn extract_earliest(&mut self) -> Result<Event, SimulationError>;

    /// Time of the earliest pending event, if any
    fn peek_time(&self) -> Option<f64>;

    /// Number of pending events
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds a scheduler of the requested mode holding `events`
pub fn build_scheduler(mode: SchedulerMode, events: Vec<Event>) -> Result<Box<dyn EventScheduler>, SimulationError> {
    Ok(match mode {
        SchedulerMode::Eager => Box::new(EagerScheduler::from_events(events)?),
        SchedulerMode::Lazy => Box::new(LazyScheduler::from_events(events)?),
    })
}

pub(crate) fn check_time(event: &Event) -> Result<(), SimulationError> {
    if !event.time.is_finite() {
        return Err(SimulationError::ConfigurationError(format!(
            "event time must be finite, got {}",
            event
        )));
    }
    Ok(())
}

pub(crate) fn check_times(events: &[Event]) -> Result<(), SimulationError> {
    events.iter().try_for_each(check_time)
}
