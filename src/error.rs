//! Error type shared by the simulation, network and evolution modules

use thiserror::Error;

use crate::game::{Item, Position};

/// Errors raised by the core. None of them are transient: each one means an
/// invariant was violated and the current operation cannot continue.
#[derive(Debug, Error, PartialEq)]
pub enum SnakeError {
    /// A grid lookup used a coordinate outside the grid
    #[error("position ({}, {}) is outside the {height}x{width} grid", .position.row, .position.col)]
    OutOfBounds {
        position: Position,
        height: usize,
        width: usize,
    },

    /// A snake was placed over a cell that is not empty
    #[error("cell ({}, {}) is already occupied by {item:?}", .position.row, .position.col)]
    Occupied { position: Position, item: Item },

    /// Apple placement found no empty cell
    #[error("no empty cell left to place an apple")]
    NoSpace,

    /// Selection was invoked on a population it cannot sample from
    #[error("invalid population: {0}")]
    InvalidPopulation(String),

    /// Two shapes that must agree did not
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A snake id that is not registered in the game
    #[error("no snake with id {0} in this game")]
    UnknownSnake(usize),

    /// A configuration value failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tensor data could not be read back from the backend
    #[error("tensor conversion failed: {0}")]
    Tensor(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SnakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = SnakeError::OutOfBounds {
            position: Position::new(-1, 4),
            height: 10,
            width: 12,
        };
        assert_eq!(
            err.to_string(),
            "position (-1, 4) is outside the 10x12 grid"
        );
    }

    #[test]
    fn test_occupied_message() {
        let err = SnakeError::Occupied {
            position: Position::new(5, 0),
            item: Item::Wall,
        };
        assert_eq!(err.to_string(), "cell (5, 0) is already occupied by Wall");
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = SnakeError::ShapeMismatch {
            context: "chromosome",
            expected: 10,
            actual: 9,
        };
        assert!(err.to_string().contains("expected 10, got 9"));
    }
}
