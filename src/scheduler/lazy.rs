use super::{check_time, EventScheduler};
use crate::types::{Event, SimulationError};
use std::collections::VecDeque;

/// Always-sorted scheduler for models that discover events while running.
///
/// The insert position is found by binary search and placed after every
/// event with the same time, so ties are served first-scheduled, first-out.
#[derive(Debug, Default, Clone)]
pub struct LazyScheduler {
    events: VecDeque<Event>,
}

impl LazyScheduler {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Seeds the scheduler with events that are known before the run starts
    pub fn from_events(mut events: Vec<Event>) -> Result<Self, SimulationError> {
        super::check_times(&events)?;
        events.sort_by(Event::cmp_time);
        Ok(Self {
            events: events.into(),
        })
    }

    /// Position at which an event at `time` keeps the set ordered
    fn insert_position(&self, time: f64) -> usize {
        self.events.partition_point(|e| e.time <= time)
    }
}

impl EventScheduler for LazyScheduler {
    fn insert(&mut self, event: Event) -> Result<(), SimulationError> {
        check_time(&event)?;
        let index = self.insert_position(event.time);
        self.events.insert(index, event);
        Ok(())
    }

    fn extract_earliest(&mut self) -> Result<Event, SimulationError> {
        self.events.pop_front().ok_or(SimulationError::EmptyScheduler)
    }

    fn peek_time(&self) -> Option<f64> {
        self.events.front().map(|e| e.time)
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}
