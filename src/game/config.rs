use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::state::{coordinate, Position};

/// Tick cadence: the delay shrinks as the snake grows, down to a floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub base_delay_ms: u64,
    pub decay_per_segment_ms: u64,
    pub min_delay_ms: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 300,
            decay_per_segment_ms: 5,
            min_delay_ms: 100,
        }
    }
}

impl SpeedConfig {
    /// `max(min_delay, base_delay - length * decay)`
    pub fn delay_for_length(&self, snake_length: usize) -> Duration {
        let decay = self
            .decay_per_segment_ms
            .saturating_mul(snake_length as u64);
        let delay = self.base_delay_ms.saturating_sub(decay);
        Duration::from_millis(delay.max(self.min_delay_ms))
    }
}

/// Largest grid side; cell coordinates must stay well inside `i32`
pub const MAX_TILE_COUNT: usize = 512;

/// Reasons a configuration cannot drive a game
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tile count must be at least 3, got {0}")]
    TooSmall(usize),
    #[error("tile count must be at most 512, got {0}")]
    TooLarge(usize),
    #[error("{what} at ({x}, {y}) lies outside a {tile_count}x{tile_count} grid")]
    OutOfBounds {
        what: &'static str,
        x: i32,
        y: i32,
        tile_count: usize,
    },
    #[error("start cell and initial food share ({0}, {1})")]
    Overlap(i32, i32),
    #[error("cell size must be at least 6 pixels, got {0}")]
    GridTooFine(u32),
    #[error("minimum delay {min}ms exceeds base delay {base}ms")]
    InvertedSpeed { min: u64, base: u64 },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each side of the square grid
    pub tile_count: usize,
    /// Size of one cell in surface pixels
    pub grid_size: u32,
    /// Cell the one-segment snake starts on
    pub start: Position,
    /// Food cell at the start of every session
    pub initial_food: Position,
    /// Score added per food eaten
    pub food_reward: u32,
    pub speed: SpeedConfig,
    /// Draw thin lines along cell boundaries
    pub show_grid: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 15,
            grid_size: 20,
            start: Position::new(7, 7),
            initial_food: Position::new(10, 10),
            food_reward: 10,
            speed: SpeedConfig::default(),
            show_grid: true,
        }
    }
}

impl GameConfig {
    /// Create a configuration for a custom grid size
    ///
    /// The snake starts in the middle and the first food sits diagonally
    /// towards the bottom-right corner.
    pub fn new(tile_count: usize) -> Self {
        let mid = tile_count / 2;
        let food = mid + (tile_count / 5).max(1);
        let (mid, food) = (coordinate(mid), coordinate(food));
        Self {
            tile_count,
            start: Position::new(mid, mid),
            initial_food: Position::new(food, food),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file; missing fields keep defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Surface width and height in pixels
    pub fn surface_size(&self) -> f64 {
        self.tile_count as f64 * self.grid_size as f64
    }

    pub fn contains(&self, pos: Position) -> bool {
        let n = coordinate(self.tile_count);
        pos.x >= 0 && pos.x < n && pos.y >= 0 && pos.y < n
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_count < 3 {
            return Err(ConfigError::TooSmall(self.tile_count));
        }
        if self.tile_count > MAX_TILE_COUNT {
            return Err(ConfigError::TooLarge(self.tile_count));
        }
        if self.grid_size < 6 {
            return Err(ConfigError::GridTooFine(self.grid_size));
        }
        for (what, pos) in [("start", self.start), ("initial food", self.initial_food)] {
            if !self.contains(pos) {
                return Err(ConfigError::OutOfBounds {
                    what,
                    x: pos.x,
                    y: pos.y,
                    tile_count: self.tile_count,
                });
            }
        }
        if self.start == self.initial_food {
            return Err(ConfigError::Overlap(self.start.x, self.start.y));
        }
        if self.speed.min_delay_ms > self.speed.base_delay_ms {
            return Err(ConfigError::InvertedSpeed {
                min: self.speed.min_delay_ms,
                base: self.speed.base_delay_ms,
            });
        }
        Ok(())
    }
}
