use log::warn;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::simulation::driver::SimulationDriver;

/// Number of animation steps in one run.
pub const TOTAL_TICKS: u32 = 50;

/// Default delay between two ticks, in milliseconds.
pub const TICK_PERIOD_MS: u64 = 100;

/// Most recent completed runs kept in the history.
pub const HISTORY_CAPACITY: usize = 5;

/// Common error type for the simulation core.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("invalid array size: {0}")]
    InvalidArraySize(u32),
    #[error("simulation state poisoned")]
    StatePoisoned,
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Driver handle shared between the timer task and its observers.
pub type SharedDriver = Arc<Mutex<SimulationDriver>>;

pub fn shared_driver(driver: SimulationDriver) -> SharedDriver {
    Arc::new(Mutex::new(driver))
}

/// Locks the driver, recovering the state if a holder panicked.
pub fn lock_driver(driver: &SharedDriver) -> MutexGuard<'_, SimulationDriver> {
    driver.lock().unwrap_or_else(|poisoned| {
        warn!("simulation state poisoned by a panicked holder, recovering");
        PoisonError::into_inner(poisoned)
    })
}
