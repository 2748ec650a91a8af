//! Progress tracking for evolution runs

pub mod training_stats;

pub use training_stats::{GenerationRecord, TrainingStats};
