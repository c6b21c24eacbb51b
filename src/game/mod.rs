//! Core game logic module for Snake
//!
//! This module contains all the game logic without any terminal or rendering
//! dependencies. Persistence goes through the `storage` abstraction, so the
//! engine runs the same against a file, memory, or a test double.

pub mod action;
pub mod config;
pub mod engine;
pub mod events;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig, SpeedConfig};
pub use engine::{GameEngine, TickInfo, TickResult};
pub use events::GameEvent;
pub use state::{CollisionType, GamePhase, GameState, Position, Snake};
