pub mod driver;
pub mod history;
pub mod metrics;
pub mod scheduler;

pub use driver::{
    DriverSnapshot, DriverStatus, SimulationDriver, SimulationState, StartOutcome, TickEvent,
};
pub use history::{classify, Efficiency, History, ResultRecord};
pub use metrics::{Metrics, MetricsDisplay};
pub use scheduler::{RunHandle, TimerService};
