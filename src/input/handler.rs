use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

use super::swipe::SwipeTracker;

/// Terminal rows are about twice as tall as columns are wide
const ROW_ASPECT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Turn(Direction),
    TogglePause,
    Restart,
    Quit,
    None,
}

pub struct InputHandler {
    swipe: SwipeTracker,
}

impl InputHandler {
    /// `min_swipe` is the shortest drag, in columns, that counts as a swipe
    pub fn new(min_swipe: f64) -> Self {
        Self {
            swipe: SwipeTracker::new(min_swipe),
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> InputAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => InputAction::Turn(Direction::Up),
            KeyCode::Down => InputAction::Turn(Direction::Down),
            KeyCode::Left => InputAction::Turn(Direction::Left),
            KeyCode::Right => InputAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => InputAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => InputAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => InputAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => InputAction::Turn(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                InputAction::TogglePause
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => InputAction::Restart,

            _ => InputAction::None,
        }
    }

    /// Left-button drags act as swipes
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> InputAction {
        let x = mouse.column as f64;
        let y = mouse.row as f64 * ROW_ASPECT;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe.begin(x, y);
                InputAction::None
            }
            MouseEventKind::Up(MouseButton::Left) => self
                .swipe
                .end(x, y)
                .map(InputAction::Turn)
                .unwrap_or(InputAction::None),
            _ => InputAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(0.0)
    }
}
