//! Snake agents
//!
//! A snake couples a body on the grid with a controller network. Each tick it
//! encodes what it sees, lets the network pick a heading, and moves.

pub mod config;
pub mod snake;
pub mod vision;

pub use config::{SnakeConfig, VisionMode, VisionType};
pub use snake::{DeathCause, Snake, fitness};
pub use vision::{Ray, Vision, VisionEncoder};
