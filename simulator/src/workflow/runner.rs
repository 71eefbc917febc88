use crate::workflow::config::{RunRequest, WorkflowConfig};
use anyhow::{anyhow, Context};
use greencore::prelude::{lock_driver, shared_driver};
use greencore::simulation::{classify, Efficiency};
use greencore::{ResultRecord, SharedDriver, SimulationDriver, TimerService};
use log::info;

pub struct WorkflowResult {
    /// One record per executed run, in execution order.
    pub records: Vec<ResultRecord>,
    /// The driver's bounded history after the last run.
    pub history: Vec<ResultRecord>,
}

impl WorkflowResult {
    pub fn efficient_count(&self) -> usize {
        self.history
            .iter()
            .filter(|record| classify(record) == Efficiency::Efficient)
            .count()
    }
}

#[derive(Clone)]
pub struct Runner {
    driver: SharedDriver,
    timer: TimerService,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> Self {
        let driver = SimulationDriver::with_selection(config.algorithm, config.array_size);
        Self {
            driver: shared_driver(driver),
            timer: config.timer(),
        }
    }

    pub fn driver(&self) -> SharedDriver {
        self.driver.clone()
    }

    pub fn timer(&self) -> TimerService {
        self.timer
    }

    /// Runs one simulation to completion on the timer.
    pub async fn execute(&self, request: RunRequest) -> anyhow::Result<ResultRecord> {
        let handle = self
            .timer
            .start(
                &self.driver,
                request.algorithm.as_str(),
                request.array_size.get(),
                |event| {
                    if event.tick % 10 == 0 {
                        let display = event.metrics.display();
                        info!(
                            "tick {}/{} -> {} {}",
                            event.tick,
                            event.total_ticks,
                            display.card_time(),
                            display.card_energy()
                        );
                    }
                },
            )
            .context("starting simulation run")?
            .ok_or_else(|| anyhow!("a simulation is already running"))?;

        handle
            .finished()
            .await
            .ok_or_else(|| anyhow!("simulation run was cancelled"))
    }

    /// Runs every request of `plan` back to back.
    pub async fn execute_plan(&self, plan: &[RunRequest]) -> anyhow::Result<WorkflowResult> {
        let mut records = Vec::with_capacity(plan.len());
        for (index, request) in plan.iter().enumerate() {
            let record = self
                .execute(*request)
                .await
                .with_context(|| format!("executing run {} of {}", index + 1, plan.len()))?;
            records.push(record);
        }

        let history = lock_driver(&self.driver).history().to_vec();

        Ok(WorkflowResult { records, history })
    }
}
