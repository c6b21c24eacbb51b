//! Grid Snake - a single-player snake game with a persistent best score
//!
//! This library provides:
//! - Core game logic: lifecycle, movement, collisions, food (game module)
//! - Best-score persistence behind a key-value store (storage module)
//! - Drawing onto an abstract surface and into the terminal (render module)
//! - Keyboard and mouse-swipe mapping (input module)
//! - The interactive terminal session (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
