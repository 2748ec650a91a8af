//! Evo Snake - Snake agents with neural controllers evolved by a genetic algorithm
//!
//! This library provides:
//! - Core game logic: grid, apples, episodes (game module)
//! - Snake agents with ray-cast vision (agent module)
//! - Feed-forward controllers on Burn and their chromosome codec (nn module)
//! - Selection, crossover and mutation over populations (genetic module)
//! - Per-generation training statistics (metrics module)
//! - Training and replay execution modes (modes module)

pub mod agent;
pub mod error;
pub mod game;
pub mod genetic;
pub mod metrics;
pub mod modes;
pub mod nn;

pub use error::{Result, SnakeError};
