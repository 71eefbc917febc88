use crate::prelude::{SimResult, SimulationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a simulated sorting algorithm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmId {
    #[default]
    Bubble,
    Quick,
    Optimized,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 3] = [AlgorithmId::Bubble, AlgorithmId::Quick, AlgorithmId::Optimized];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::Bubble => "bubble",
            AlgorithmId::Quick => "quick",
            AlgorithmId::Optimized => "optimized",
        }
    }

    pub fn profile(&self) -> &'static AlgorithmProfile {
        match self {
            AlgorithmId::Bubble => &PROFILES[0],
            AlgorithmId::Quick => &PROFILES[1],
            AlgorithmId::Optimized => &PROFILES[2],
        }
    }
}

impl FromStr for AlgorithmId {
    type Err = SimulationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "bubble" => Ok(AlgorithmId::Bubble),
            "quick" => Ok(AlgorithmId::Quick),
            "optimized" => Ok(AlgorithmId::Optimized),
            other => Err(SimulationError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Selector label, e.g. `Bubble Sort - O(n²)`.
impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile();
        write!(f, "{} - {}", profile.display_name, profile.complexity)
    }
}

/// Display colour attached to each profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Yellow,
    Green,
}

impl ColorTag {
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            ColorTag::Red => (0.94, 0.27, 0.27),
            ColorTag::Yellow => (0.92, 0.70, 0.03),
            ColorTag::Green => (0.13, 0.77, 0.37),
        }
    }
}

/// Qualitative impact notes shown next to the figures.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ImpactSummary {
    pub energy: &'static str,
    pub co2: &'static str,
    pub cost: &'static str,
    pub scalability: &'static str,
}

/// Static descriptor of a simulated algorithm.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AlgorithmProfile {
    pub id: AlgorithmId,
    pub display_name: &'static str,
    pub complexity: &'static str,
    pub energy_multiplier: f64,
    pub color: ColorTag,
    pub impact: ImpactSummary,
}

pub static PROFILES: [AlgorithmProfile; 3] = [
    AlgorithmProfile {
        id: AlgorithmId::Bubble,
        display_name: "Bubble Sort",
        complexity: "O(n²)",
        energy_multiplier: 100.0,
        color: ColorTag::Red,
        impact: ImpactSummary {
            energy: "High consumption",
            co2: "~100x baseline",
            cost: "Expensive at scale",
            scalability: "Poor",
        },
    },
    AlgorithmProfile {
        id: AlgorithmId::Quick,
        display_name: "Quick Sort",
        complexity: "O(n log n)",
        energy_multiplier: 5.0,
        color: ColorTag::Yellow,
        impact: ImpactSummary {
            energy: "Moderate consumption",
            co2: "~5x baseline",
            cost: "Reasonable",
            scalability: "Good",
        },
    },
    AlgorithmProfile {
        id: AlgorithmId::Optimized,
        display_name: "Optimized Sort",
        complexity: "O(n log n)",
        energy_multiplier: 1.0,
        color: ColorTag::Green,
        impact: ImpactSummary {
            energy: "Minimal consumption",
            co2: "Baseline efficient",
            cost: "Cost-effective",
            scalability: "Excellent",
        },
    },
];

/// Resolves a raw identifier against the profile table.
pub fn lookup(id: &str) -> SimResult<&'static AlgorithmProfile> {
    id.parse::<AlgorithmId>().map(|algorithm| algorithm.profile())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_known_ids() {
        assert_eq!(lookup("bubble").unwrap().energy_multiplier, 100.0);
        assert_eq!(lookup("quick").unwrap().energy_multiplier, 5.0);
        assert_eq!(lookup("optimized").unwrap().display_name, "Optimized Sort");
    }

    #[test]
    fn lookup_rejects_unknown_id() {
        assert_eq!(
            lookup("merge").unwrap_err(),
            SimulationError::UnknownAlgorithm("merge".into())
        );
    }

    #[test]
    fn profile_table_matches_ids() {
        for id in AlgorithmId::ALL {
            assert_eq!(id.profile().id, id);
            assert_eq!(lookup(id.as_str()).unwrap().id, id);
        }
    }

    #[test]
    fn selector_label_includes_complexity() {
        assert_eq!(AlgorithmId::Bubble.to_string(), "Bubble Sort - O(n²)");
        assert_eq!(AlgorithmId::Quick.to_string(), "Quick Sort - O(n log n)");
    }

    #[test]
    fn ids_serialize_lowercase() {
        let encoded = serde_json::to_string(&AlgorithmId::Optimized).unwrap();
        assert_eq!(encoded, "\"optimized\"");
        let decoded: AlgorithmId = serde_json::from_str("\"quick\"").unwrap();
        assert_eq!(decoded, AlgorithmId::Quick);
    }
}
