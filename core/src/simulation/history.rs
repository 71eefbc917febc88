use crate::prelude::HISTORY_CAPACITY;
use crate::profile::{AlgorithmId, ArraySize};
use crate::simulation::metrics::{Metrics, EFFICIENCY_THRESHOLD_GRAMS};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Summary of one completed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub algorithm: AlgorithmId,
    pub algorithm_name: String,
    pub array_size: ArraySize,
    pub metrics: Metrics,
}

impl ResultRecord {
    pub fn new(algorithm: AlgorithmId, array_size: ArraySize, metrics: Metrics) -> Self {
        Self {
            algorithm,
            algorithm_name: algorithm.profile().display_name.to_string(),
            array_size,
            metrics,
        }
    }

    pub fn efficiency(&self) -> Efficiency {
        classify(self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Efficiency {
    Efficient,
    Inefficient,
}

impl Efficiency {
    pub fn label(&self) -> &'static str {
        match self {
            Efficiency::Efficient => "Efficient",
            Efficiency::Inefficient => "Inefficient",
        }
    }
}

pub fn classify(record: &ResultRecord) -> Efficiency {
    if record.metrics.carbon_grams < EFFICIENCY_THRESHOLD_GRAMS {
        Efficiency::Efficient
    } else {
        Efficiency::Inefficient
    }
}

/// Bounded FIFO of completed runs. The oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct History {
    records: VecDeque<ResultRecord>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<ResultRecord> {
        self.records.iter().cloned().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(algorithm: AlgorithmId, size: u32, time: f64) -> ResultRecord {
        ResultRecord::new(
            algorithm,
            ArraySize::try_from(size).unwrap(),
            Metrics::from_execution_time(time),
        )
    }

    #[test]
    fn history_keeps_five_most_recent_in_order() {
        let mut history = History::new();
        for run in 0..6 {
            history.push(record(AlgorithmId::Quick, 500, run as f64));
        }
        assert_eq!(history.len(), 5);
        let times: Vec<f64> = history.iter().map(|r| r.metrics.execution_time).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn clear_empties_history() {
        let mut history = History::new();
        history.push(record(AlgorithmId::Bubble, 1000, 100.0));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn classify_splits_on_one_milligram() {
        // 392 µg
        assert_eq!(
            record(AlgorithmId::Bubble, 1000, 100.0).efficiency(),
            Efficiency::Efficient
        );
        // 3.92 mg
        assert_eq!(
            record(AlgorithmId::Bubble, 10000, 1000.0).efficiency(),
            Efficiency::Inefficient
        );
    }

    #[test]
    fn record_carries_display_name() {
        let entry = record(AlgorithmId::Optimized, 500, 0.5);
        assert_eq!(entry.algorithm_name, "Optimized Sort");
        assert_eq!(entry.efficiency().label(), "Efficient");
    }
}
