//! Drawing: the board onto an abstract surface, and the terminal frame
//! around it

pub mod board;
pub mod canvas;
pub mod hud;
pub mod renderer;
pub mod surface;

pub use board::{BoardRenderer, Palette};
pub use hud::{Hud, Notice, NoticeKind};
pub use renderer::Renderer;
pub use surface::{Color, DisplayList, DrawCommand, Surface, TextAlign};
