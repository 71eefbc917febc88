pub mod lessons;
pub mod size;
pub mod table;

pub use lessons::{CodeSample, LearningPoints, CODE_SAMPLES, DEMO_STEPS, LEARNING_POINTS};
pub use size::{group_thousands, ArraySize};
pub use table::{lookup, AlgorithmId, AlgorithmProfile, ColorTag, ImpactSummary, PROFILES};
