use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::state::{GridWorld, Position, SnakeId};
use crate::error::ConfigError;

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Milliseconds between simulation ticks in watch mode
    pub tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 80,
            grid_height: 80,
            tick_ms: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn world(&self) -> GridWorld {
        GridWorld::new(self.grid_width, self.grid_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Spawn cell of each snake: a quarter and three quarters across, vertically centred
    pub fn spawn_position(&self, id: SnakeId) -> Position {
        let x = match id {
            SnakeId::First => self.grid_width / 4,
            SnakeId::Second => 3 * self.grid_width / 4,
        };
        Position::new(x as i32, (self.grid_height / 2) as i32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Narrower grids would spawn both snakes on the same column
        if self.grid_width < 4 || self.grid_height < 1 {
            return Err(ConfigError::Validation(format!(
                "grid must be at least 4x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err(ConfigError::Validation("grid dimensions overflow i32".into()));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Validation("tick_ms must be > 0".into()));
        }
        Ok(())
    }
}
