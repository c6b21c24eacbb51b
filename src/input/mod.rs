//! Maps raw terminal events onto engine requests

pub mod handler;
pub mod swipe;

pub use handler::{InputAction, InputHandler};
pub use swipe::{classify_swipe, SwipeTracker};
