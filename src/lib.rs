pub mod types;
pub mod variate;
pub mod scheduler;
pub mod queue;
pub mod bus;
pub mod utils;

pub use types::{Event, EventKind, SimulationError};
pub use variate::VariateGenerator;
pub use scheduler::{EventScheduler, EagerScheduler, LazyScheduler, SchedulerMode};
pub use queue::{run_queue_simulation, QueueParameters, QueueResults};
pub use bus::{run_bus_simulation, BusParameters, BusResults, BusSimulation, SensingPolicy};
