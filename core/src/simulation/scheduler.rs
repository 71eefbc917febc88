use crate::prelude::{lock_driver, SharedDriver, SimResult, TICK_PERIOD_MS};
use crate::simulation::driver::{StartOutcome, TickEvent};
use crate::simulation::history::ResultRecord;
use log::debug;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Drives a [`SharedDriver`] on a fixed cadence. The next sleep starts only
/// after the previous tick is published.
#[derive(Debug, Clone, Copy)]
pub struct TimerService {
    period: Duration,
}

impl TimerService {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// `None` when a run is already active on the driver.
    pub fn start_selected<F>(
        &self,
        driver: &SharedDriver,
        on_tick: F,
    ) -> SimResult<Option<RunHandle>>
    where
        F: FnMut(&TickEvent) + Send + 'static,
    {
        let (outcome, run_id) = {
            let mut guard = lock_driver(driver);
            (guard.start_selected(), guard.run_id())
        };
        Ok(self.spawn_if_started(outcome, run_id, driver, on_tick))
    }

    pub fn start<F>(
        &self,
        driver: &SharedDriver,
        algorithm: &str,
        array_size: u32,
        on_tick: F,
    ) -> SimResult<Option<RunHandle>>
    where
        F: FnMut(&TickEvent) + Send + 'static,
    {
        let (outcome, run_id) = {
            let mut guard = lock_driver(driver);
            (guard.start(algorithm, array_size)?, guard.run_id())
        };
        Ok(self.spawn_if_started(outcome, run_id, driver, on_tick))
    }

    fn spawn_if_started<F>(
        &self,
        outcome: StartOutcome,
        run_id: u64,
        driver: &SharedDriver,
        on_tick: F,
    ) -> Option<RunHandle>
    where
        F: FnMut(&TickEvent) + Send + 'static,
    {
        match outcome {
            StartOutcome::Started => Some(self.spawn(driver.clone(), run_id, on_tick)),
            StartOutcome::AlreadyRunning => None,
        }
    }

    pub fn spawn<F>(&self, driver: SharedDriver, run_id: u64, mut on_tick: F) -> RunHandle
    where
        F: FnMut(&TickEvent) + Send + 'static,
    {
        let period = self.period;
        let (done_tx, done_rx) = oneshot::channel();
        let task_driver = driver.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let event = lock_driver(&task_driver).advance_run(run_id);
                let Some(event) = event else {
                    break;
                };
                on_tick(&event);
                if let Some(record) = event.record {
                    let _ = done_tx.send(record);
                    return;
                }
            }
            debug!("timer task stopped before the final tick");
        });

        RunHandle {
            driver,
            run_id,
            task: Some(task),
            done: Some(done_rx),
        }
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_PERIOD_MS))
    }
}

/// Owns the timer task of one run. Dropping it before the final tick cancels the run.
pub struct RunHandle {
    driver: SharedDriver,
    run_id: u64,
    task: Option<JoinHandle<()>>,
    done: Option<oneshot::Receiver<ResultRecord>>,
}

impl RunHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// `None` when the run was cancelled.
    pub async fn finished(mut self) -> Option<ResultRecord> {
        let done = self.done.take()?;
        let record = done.await.ok();
        self.task.take();
        record
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            lock_driver(&self.driver).cancel_run(self.run_id);
        }
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
