use crate::profile::{AlgorithmId, ArraySize};
use crate::simulation::metrics::Metrics;
use log::{debug, info, warn};

/// Log sink used by the driver for run lifecycle events.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn run_started(&self, algorithm: AlgorithmId, size: ArraySize) {
        info!(
            "run started: {} on {}",
            algorithm.profile().display_name,
            size
        );
    }

    pub fn tick(&self, tick: u32, total: u32, metrics: &Metrics) {
        debug!(
            "tick {}/{} time {:.3}s energy {:.4}J",
            tick, total, metrics.execution_time, metrics.energy_joules
        );
    }

    pub fn run_completed(&self, algorithm: AlgorithmId, metrics: &Metrics) {
        let display = metrics.display();
        info!(
            "run completed: {} time {} energy {} carbon {}",
            algorithm.profile().display_name,
            display.card_time(),
            display.card_energy(),
            display.card_carbon()
        );
    }

    pub fn run_cancelled(&self, tick: u32, total: u32) {
        warn!("run cancelled at tick {}/{}", tick, total);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
