use serde::{Deserialize, Serialize};

use crate::error::{Result, SnakeError};
use crate::game::GameConfig;

/// Which rays the vision encoder casts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionMode {
    /// Ahead, right, behind, left
    Four,
    /// Adds the four diagonals
    Eight,
    /// Adds the eight knight-step rays between those
    Sixteen,
}

impl VisionMode {
    pub fn num_rays(self) -> usize {
        match self {
            VisionMode::Four => 4,
            VisionMode::Eight => 8,
            VisionMode::Sixteen => 16,
        }
    }
}

/// How body and apple hits are reported along a ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionType {
    /// 1.0 if seen, 0.0 otherwise
    Binary,
    /// Inverse distance to the first hit, 0.0 if none
    Distance,
}

/// Configuration for one snake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnakeConfig {
    /// Body length at spawn
    pub initial_length: usize,
    /// Rays cast by the vision encoder
    pub vision_mode: VisionMode,
    /// Encoding of body/apple hits
    pub vision_type: VisionType,
    /// Moves allowed without eating; refilled by every apple
    pub max_lifespan: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            initial_length: 3,
            vision_mode: VisionMode::Eight,
            vision_type: VisionType::Distance,
            max_lifespan: 100,
        }
    }
}

impl SnakeConfig {
    /// Check the snake fits the walled grid it will spawn in
    ///
    /// The snake spawns with its head at the grid center facing right and its
    /// body extending left, so the whole body must stay inside the walls.
    pub fn validate(&self, game: &GameConfig) -> Result<()> {
        if self.initial_length == 0 {
            return Err(SnakeError::InvalidConfig(
                "initial_length must be at least 1".to_string(),
            ));
        }
        if self.max_lifespan == 0 {
            return Err(SnakeError::InvalidConfig(
                "max_lifespan must be at least 1".to_string(),
            ));
        }
        if self.initial_length > game.grid_width / 2 {
            return Err(SnakeError::InvalidConfig(format!(
                "initial_length {} does not fit a grid {} cells wide",
                self.initial_length, game.grid_width
            )));
        }
        Ok(())
    }
}
