use super::{check_time, check_times, EventScheduler};
use crate::types::{Event, SimulationError};

/// Scheduler for fully precomputed event streams.
///
/// Events may be added until the first extraction; the set is then sorted once
/// (stable, so equal times keep their insertion order) and read front to back.
#[derive(Debug, Clone)]
pub struct EagerScheduler {
    events: Vec<Event>,
    /// Index of the next event to hand out
    cursor: usize,
    sorted: bool,
}

impl EagerScheduler {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            cursor: 0,
            sorted: true,
        }
    }

    /// Concatenated streams, sorted immediately
    pub fn from_events(events: Vec<Event>) -> Result<Self, SimulationError> {
        check_times(&events)?;
        let mut scheduler = Self {
            events,
            cursor: 0,
            sorted: false,
        };
        scheduler.seal();
        Ok(scheduler)
    }

    /// Sorts pending events; further inserts are rejected once extraction starts
    pub fn seal(&mut self) {
        if !self.sorted {
            self.events.sort_by(Event::cmp_time);
            self.sorted = true;
        }
    }
}

impl Default for EagerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventScheduler for EagerScheduler {
    fn insert(&mut self, event: Event) -> Result<(), SimulationError> {
        check_time(&event)?;
        if self.cursor > 0 {
            return Err(SimulationError::ConfigurationError(format!(
                "eager scheduler cannot accept {} after extraction started",
                event
            )));
        }
        self.events.push(event);
        self.sorted = false;
        Ok(())
    }

    fn extract_earliest(&mut self) -> Result<Event, SimulationError> {
        self.seal();
        let event = *self
            .events
            .get(self.cursor)
            .ok_or(SimulationError::EmptyScheduler)?;
        self.cursor += 1;
        Ok(event)
    }

    fn peek_time(&self) -> Option<f64> {
        let pending = &self.events[self.cursor..];
        if self.sorted {
            pending.first().map(|e| e.time)
        } else {
            pending.iter().map(|e| e.time).min_by(f64::total_cmp)
        }
    }

    fn len(&self) -> usize {
        self.events.len() - self.cursor
    }
}
