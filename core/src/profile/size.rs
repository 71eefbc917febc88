use crate::prelude::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of elements in the simulated input, restricted to the selector options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct ArraySize(u32);

impl ArraySize {
    pub const OPTIONS: [ArraySize; 4] = [
        ArraySize(500),
        ArraySize(1_000),
        ArraySize(5_000),
        ArraySize(10_000),
    ];

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for ArraySize {
    fn default() -> Self {
        ArraySize(1_000)
    }
}

impl TryFrom<u32> for ArraySize {
    type Error = SimulationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::OPTIONS
            .iter()
            .copied()
            .find(|option| option.0 == value)
            .ok_or(SimulationError::InvalidArraySize(value))
    }
}

impl From<ArraySize> for u32 {
    fn from(size: ArraySize) -> Self {
        size.0
    }
}

impl fmt::Display for ArraySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} elements", group_thousands(self.0 as u64))
    }
}

/// Renders an integer with comma thousands separators (`10000` -> `10,000`).
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_selector_options() {
        for raw in [500, 1000, 5000, 10000] {
            assert_eq!(ArraySize::try_from(raw).unwrap().get(), raw);
        }
    }

    #[test]
    fn rejects_values_outside_options() {
        assert_eq!(
            ArraySize::try_from(2000).unwrap_err(),
            SimulationError::InvalidArraySize(2000)
        );
        assert!(ArraySize::try_from(0).is_err());
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(ArraySize::default().to_string(), "1,000 elements");
        assert_eq!(ArraySize::OPTIONS[0].to_string(), "500 elements");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn deserialization_validates() {
        let size: ArraySize = serde_json::from_str("5000").unwrap();
        assert_eq!(size.get(), 5000);
        assert!(serde_json::from_str::<ArraySize>("42").is_err());
    }
}
