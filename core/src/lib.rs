//! Simulation core for the green-computing energy monitor.
//!
//! Models three sorting-algorithm profiles and a fixed-cadence animation that
//! ramps their fabricated time, cycle, energy and carbon figures from zero to
//! a final value, keeping a short history of completed runs.

pub mod prelude;
pub mod profile;
pub mod simulation;
pub mod telemetry;

pub use prelude::{SharedDriver, SimResult, SimulationError};
pub use profile::{lookup, AlgorithmId, AlgorithmProfile, ArraySize};
pub use simulation::{Metrics, ResultRecord, RunHandle, SimulationDriver, TimerService};
