use anyhow::Context;
use greencore::prelude::TICK_PERIOD_MS;
use greencore::{AlgorithmId, ArraySize, TimerService};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// One requested run in a batch.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRequest {
    pub algorithm: AlgorithmId,
    pub array_size: ArraySize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub algorithm: AlgorithmId,
    pub array_size: ArraySize,
    pub tick_period_ms: u64,
    pub bind_address: SocketAddr,
    pub runs: Vec<RunRequest>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmId::default(),
            array_size: ArraySize::default(),
            tick_period_ms: TICK_PERIOD_MS,
            bind_address: SocketAddr::from(([127, 0, 0, 1], 9000)),
            runs: Vec::new(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        algorithm: Option<&str>,
        array_size: Option<u32>,
        tick_period_ms: Option<u64>,
    ) -> anyhow::Result<Self> {
        if let Some(raw) = algorithm {
            self.algorithm = raw
                .parse()
                .with_context(|| format!("resolving --algorithm {raw}"))?;
        }
        if let Some(raw) = array_size {
            self.array_size = ArraySize::try_from(raw)
                .with_context(|| format!("resolving --array-size {raw}"))?;
        }
        if let Some(period) = tick_period_ms {
            self.tick_period_ms = period;
        }
        Ok(self)
    }

    /// Runs to execute offline: the batch if present, otherwise the single selection.
    pub fn plan(&self) -> Vec<RunRequest> {
        if self.runs.is_empty() {
            vec![RunRequest {
                algorithm: self.algorithm,
                array_size: self.array_size,
            }]
        } else {
            self.runs.clone()
        }
    }

    pub fn timer(&self) -> TimerService {
        TimerService::new(Duration::from_millis(self.tick_period_ms))
    }
}
