//! Core game logic module for Snake
//!
//! This module contains the grid, the apple bookkeeping and the episode
//! orchestration, without any I/O or rendering dependencies.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{Board, Game, SnakeId};
pub use grid::{Cell, Grid, Item, Position};
