pub mod replay;
pub mod train;

pub use replay::{ReplayMode, ReplayOutcome};
pub use train::{TrainConfig, TrainMode};
