use crate::game::{GamePhase, GameState};

use super::surface::{Color, Surface, TextAlign};

/// Colors used on the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub head: Color,
    pub body: Color,
    pub food: Color,
    pub grid: Color,
    pub overlay: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0xf0, 0xf0, 0xf0),
            head: Color::rgb(0x2e, 0x7d, 0x32),
            body: Color::rgb(0x4c, 0xaf, 0x50),
            food: Color::rgb(0xff, 0x57, 0x22),
            grid: Color::rgb(0xdd, 0xdd, 0xdd),
            overlay: Color::rgba(0, 0, 0, 178),
            text: Color::WHITE,
        }
    }
}

pub const START_HINT: [&str; 2] = ["Press an arrow key or swipe", "to start the game!"];

const GRID_LINE_WIDTH: f64 = 0.5;

/// Draws the grid, snake and food onto any [`Surface`]
///
/// Drawing only reads the state, so calling it repeatedly is harmless.
#[derive(Debug, Clone)]
pub struct BoardRenderer {
    cell_size: f64,
    show_grid: bool,
    palette: Palette,
}

impl BoardRenderer {
    pub fn new(cell_size: u32, show_grid: bool) -> Self {
        Self {
            cell_size: cell_size as f64,
            show_grid,
            palette: Palette::default(),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn render(&self, state: &GameState, surface: &mut dyn Surface) {
        let (width, height) = (surface.width(), surface.height());
        let g = self.cell_size;

        surface.clear_rect(0.0, 0.0, width, height);
        surface.fill_rect(0.0, 0.0, width, height, self.palette.background);

        for (i, segment) in state.snake.segments().iter().enumerate() {
            let color = if i == 0 {
                self.palette.head
            } else {
                self.palette.body
            };
            surface.fill_rect(
                segment.x as f64 * g + 1.0,
                segment.y as f64 * g + 1.0,
                g - 2.0,
                g - 2.0,
                color,
            );
        }

        surface.fill_circle(
            state.food.x as f64 * g + g / 2.0,
            state.food.y as f64 * g + g / 2.0,
            g / 2.0 - 2.0,
            self.palette.food,
        );

        if self.show_grid {
            for i in 0..=state.tile_count {
                let offset = i as f64 * g;
                surface.stroke_line(
                    offset,
                    0.0,
                    offset,
                    height,
                    GRID_LINE_WIDTH,
                    self.palette.grid,
                );
                surface.stroke_line(
                    0.0,
                    offset,
                    width,
                    offset,
                    GRID_LINE_WIDTH,
                    self.palette.grid,
                );
            }
        }

        if state.phase == GamePhase::NotStarted {
            surface.fill_rect(0.0, 0.0, width, height, self.palette.overlay);
            surface.fill_text(
                START_HINT[0],
                width / 2.0,
                height / 2.0 - 20.0,
                TextAlign::Center,
                self.palette.text,
            );
            surface.fill_text(
                START_HINT[1],
                width / 2.0,
                height / 2.0 + 10.0,
                TextAlign::Center,
                self.palette.text,
            );
        }
    }
}
