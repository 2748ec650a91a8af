use serde::{Deserialize, Serialize};

use crate::error::{Result, SnakeError};

/// Configuration for the game board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Height of the game grid, walls included
    pub grid_height: usize,
    /// Width of the game grid, walls included
    pub grid_width: usize,
    /// Seed for the run's random source; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_height: 20,
            grid_width: 20,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            grid_height: height,
            grid_width: width,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Same configuration with a fixed seed
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// The walled grid needs at least a 2x2 interior
    pub fn validate(&self) -> Result<()> {
        if self.grid_height < 4 || self.grid_width < 4 {
            return Err(SnakeError::InvalidConfig(format!(
                "grid must be at least 4x4, got {}x{}",
                self.grid_height, self.grid_width
            )));
        }
        Ok(())
    }
}
