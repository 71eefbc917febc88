use crate::prelude::{SimResult, TOTAL_TICKS};
use crate::profile::{AlgorithmId, ArraySize};
use crate::simulation::history::{History, ResultRecord};
use crate::simulation::metrics::{base_time, Metrics};
use crate::telemetry::{LogManager, MetricsRecorder, RunCounters};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Idle,
    Running,
}

impl DriverStatus {
    pub fn action_label(&self) -> &'static str {
        match self {
            DriverStatus::Idle => "Run Test",
            DriverStatus::Running => "Running...",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationState {
    pub algorithm: AlgorithmId,
    pub array_size: ArraySize,
    pub status: DriverStatus,
    pub tick: u32,
}

impl SimulationState {
    pub fn is_running(&self) -> bool {
        self.status == DriverStatus::Running
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmId::default(),
            array_size: ArraySize::default(),
            status: DriverStatus::Idle,
            tick: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickEvent {
    pub tick: u32,
    pub total_ticks: u32,
    pub metrics: Metrics,
    /// Present on the final tick only.
    pub record: Option<ResultRecord>,
}

impl TickEvent {
    pub fn is_final(&self) -> bool {
        self.record.is_some()
    }
}

/// Idle/Running state machine. Owns no clock: each `advance` is one tick.
pub struct SimulationDriver {
    state: SimulationState,
    metrics: Metrics,
    history: History,
    total_ticks: u32,
    run_id: u64,
    logger: LogManager,
    recorder: MetricsRecorder,
}

impl SimulationDriver {
    pub fn new() -> Self {
        Self::with_selection(AlgorithmId::default(), ArraySize::default())
    }

    pub fn with_selection(algorithm: AlgorithmId, array_size: ArraySize) -> Self {
        Self {
            state: SimulationState {
                algorithm,
                array_size,
                ..SimulationState::default()
            },
            metrics: Metrics::zero(),
            history: History::new(),
            total_ticks: TOTAL_TICKS,
            run_id: 0,
            logger: LogManager::new(),
            recorder: MetricsRecorder::new(),
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn counters(&self) -> RunCounters {
        self.recorder.snapshot()
    }

    pub fn select_algorithm(&mut self, algorithm: AlgorithmId) -> bool {
        if self.is_running() {
            return false;
        }
        self.state.algorithm = algorithm;
        true
    }

    pub fn select_array_size(&mut self, array_size: ArraySize) -> bool {
        if self.is_running() {
            return false;
        }
        self.state.array_size = array_size;
        true
    }

    /// No-op while running, checked before the inputs are validated.
    pub fn start(&mut self, algorithm: &str, array_size: u32) -> SimResult<StartOutcome> {
        if self.is_running() {
            return Ok(StartOutcome::AlreadyRunning);
        }
        let algorithm = algorithm.parse::<AlgorithmId>()?;
        let array_size = ArraySize::try_from(array_size)?;
        Ok(self.begin(algorithm, array_size))
    }

    pub fn start_selected(&mut self) -> StartOutcome {
        if self.is_running() {
            return StartOutcome::AlreadyRunning;
        }
        self.begin(self.state.algorithm, self.state.array_size)
    }

    fn begin(&mut self, algorithm: AlgorithmId, array_size: ArraySize) -> StartOutcome {
        self.state.algorithm = algorithm;
        self.state.array_size = array_size;
        self.state.status = DriverStatus::Running;
        self.state.tick = 0;
        self.run_id += 1;
        self.recorder.record_started();
        self.logger.run_started(algorithm, array_size);
        StartOutcome::Started
    }

    pub fn advance(&mut self) -> Option<TickEvent> {
        if !self.is_running() {
            return None;
        }

        let profile = self.state.algorithm.profile();
        let base = base_time(profile, self.state.array_size);
        self.state.tick += 1;
        self.metrics = Metrics::at_tick(base, self.state.tick, self.total_ticks);
        self.recorder.record_tick();
        self.logger
            .tick(self.state.tick, self.total_ticks, &self.metrics);

        let record = if self.state.tick >= self.total_ticks {
            let record =
                ResultRecord::new(self.state.algorithm, self.state.array_size, self.metrics);
            self.history.push(record.clone());
            self.state.status = DriverStatus::Idle;
            self.recorder.record_completed();
            self.logger
                .run_completed(self.state.algorithm, &self.metrics);
            Some(record)
        } else {
            None
        };

        Some(TickEvent {
            tick: self.state.tick,
            total_ticks: self.total_ticks,
            metrics: self.metrics,
            record,
        })
    }

    pub fn advance_run(&mut self, run_id: u64) -> Option<TickEvent> {
        if run_id != self.run_id {
            return None;
        }
        self.advance()
    }

    /// Back to idle without recording the run.
    pub fn cancel(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state.status = DriverStatus::Idle;
        self.recorder.record_cancelled();
        self.logger.run_cancelled(self.state.tick, self.total_ticks);
        true
    }

    pub fn cancel_run(&mut self, run_id: u64) -> bool {
        run_id == self.run_id && self.cancel()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.metrics = Metrics::zero();
        self.logger.record("results cleared");
    }

    pub fn snapshot(&self) -> DriverSnapshot {
        DriverSnapshot {
            state: self.state,
            total_ticks: self.total_ticks,
            metrics: self.metrics,
            history: self.history.to_vec(),
            counters: self.counters(),
        }
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverSnapshot {
    pub state: SimulationState,
    pub total_ticks: u32,
    pub metrics: Metrics,
    pub history: Vec<ResultRecord>,
    pub counters: RunCounters,
}
