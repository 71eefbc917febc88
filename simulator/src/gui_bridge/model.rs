use greencore::simulation::{DriverSnapshot, Efficiency};
use greencore::telemetry::RunCounters;
use greencore::{AlgorithmId, ArraySize, Metrics, ResultRecord};
use serde::{Deserialize, Serialize};

/// A completed run together with its efficiency tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRow {
    #[serde(flatten)]
    pub record: ResultRecord,
    pub efficiency: Efficiency,
}

/// State published to the visualizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualizationModel {
    pub algorithm: AlgorithmId,
    pub array_size: ArraySize,
    pub running: bool,
    pub tick: u32,
    pub total_ticks: u32,
    pub action_label: String,
    pub metrics: Metrics,
    pub history: Vec<HistoryRow>,
    pub counters: RunCounters,
}

impl From<DriverSnapshot> for VisualizationModel {
    fn from(snapshot: DriverSnapshot) -> Self {
        let history = snapshot
            .history
            .into_iter()
            .map(|record| HistoryRow {
                efficiency: record.efficiency(),
                record,
            })
            .collect();
        Self {
            algorithm: snapshot.state.algorithm,
            array_size: snapshot.state.array_size,
            running: snapshot.state.is_running(),
            tick: snapshot.state.tick,
            total_ticks: snapshot.total_ticks,
            action_label: snapshot.state.status.action_label().to_string(),
            metrics: snapshot.metrics,
            history,
            counters: snapshot.counters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greencore::SimulationDriver;

    #[test]
    fn model_tags_history_rows() {
        let mut driver = SimulationDriver::new();
        driver.start("bubble", 10000).unwrap();
        while driver.advance().is_some() {}
        let model = VisualizationModel::from(driver.snapshot());
        assert!(!model.running);
        assert_eq!(model.action_label, "Run Test");
        assert_eq!(model.history.len(), 1);
        assert_eq!(model.history[0].efficiency, Efficiency::Inefficient);
    }

    #[test]
    fn model_serializes_flat_rows() {
        let mut driver = SimulationDriver::new();
        driver.start("optimized", 500).unwrap();
        while driver.advance().is_some() {}
        let json = serde_json::to_value(VisualizationModel::from(driver.snapshot())).unwrap();
        let row = &json["history"][0];
        assert_eq!(row["algorithm"], "optimized");
        assert_eq!(row["array_size"], 500);
        assert_eq!(row["efficiency"], "efficient");
    }
}
