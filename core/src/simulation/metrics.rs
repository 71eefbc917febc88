use crate::profile::{AlgorithmProfile, ArraySize};
use serde::{Deserialize, Serialize};

/// Modelled processor clock, in hertz.
pub const CLOCK_HZ: f64 = 2_800_000_000.0;

/// Energy attributed to a single cycle, in joules.
pub const JOULES_PER_CYCLE: f64 = 3.5e-12;

/// Grid carbon intensity, in grams of CO₂ per joule.
pub const CO2_GRAMS_PER_JOULE: f64 = 0.0004;

/// Runs emitting less than this many grams are tagged efficient.
pub const EFFICIENCY_THRESHOLD_GRAMS: f64 = 0.001;

/// Fabricated cost figures for one point of the ramp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Metrics {
    /// Seconds.
    pub execution_time: f64,
    pub cpu_cycles: f64,
    /// Joules.
    pub energy_joules: f64,
    /// Grams of CO₂.
    pub carbon_grams: f64,
}

/// Final execution time of a run: `(size / 1000) * multiplier` seconds.
pub fn base_time(profile: &AlgorithmProfile, size: ArraySize) -> f64 {
    (size.get() as f64 / 1000.0) * profile.energy_multiplier
}

impl Metrics {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Derives every figure from an execution time.
    pub fn from_execution_time(execution_time: f64) -> Self {
        let cpu_cycles = execution_time * CLOCK_HZ;
        let energy_joules = cpu_cycles * JOULES_PER_CYCLE;
        let carbon_grams = energy_joules * CO2_GRAMS_PER_JOULE;
        Self {
            execution_time,
            cpu_cycles,
            energy_joules,
            carbon_grams,
        }
    }

    /// Linear ramp position `tick / total` of a run whose final time is `base`.
    pub fn at_tick(base: f64, tick: u32, total: u32) -> Self {
        let total = total.max(1);
        Self::from_execution_time(base * tick as f64 / total as f64)
    }

    pub fn display(&self) -> MetricsDisplay {
        MetricsDisplay::from(self)
    }
}

/// Text rendering of [`Metrics`] in the units shown on the cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsDisplay {
    pub seconds: String,
    pub mega_cycles: String,
    pub millijoules: String,
    pub micrograms: String,
}

impl From<&Metrics> for MetricsDisplay {
    fn from(metrics: &Metrics) -> Self {
        Self {
            seconds: format!("{:.3}", metrics.execution_time),
            mega_cycles: format!("{:.1}", metrics.cpu_cycles / 1_000_000.0),
            millijoules: format!("{:.2}", metrics.energy_joules * 1000.0),
            micrograms: format!("{:.2}", metrics.carbon_grams * 1_000_000.0),
        }
    }
}

impl MetricsDisplay {
    pub fn card_time(&self) -> String {
        format!("{}s", self.seconds)
    }

    pub fn card_cycles(&self) -> String {
        format!("{}M", self.mega_cycles)
    }

    pub fn card_energy(&self) -> String {
        format!("{}mJ", self.millijoules)
    }

    pub fn card_carbon(&self) -> String {
        format!("{}μg", self.micrograms)
    }
}
