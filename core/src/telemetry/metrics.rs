use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Lifetime counters of one driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub started: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub ticks: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<RunCounters>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RunCounters::default()),
        }
    }

    pub fn record_started(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.started += 1;
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.ticks += 1;
        }
    }

    pub fn record_completed(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.completed += 1;
        }
    }

    pub fn record_cancelled(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.cancelled += 1;
        }
    }

    pub fn snapshot(&self) -> RunCounters {
        if let Ok(counters) = self.inner.lock() {
            *counters
        } else {
            RunCounters::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_events() {
        let recorder = MetricsRecorder::new();
        recorder.record_started();
        recorder.record_tick();
        recorder.record_tick();
        recorder.record_cancelled();
        let counters = recorder.snapshot();
        assert_eq!(counters.started, 1);
        assert_eq!(counters.ticks, 2);
        assert_eq!(counters.cancelled, 1);
        assert_eq!(counters.completed, 0);
    }
}
