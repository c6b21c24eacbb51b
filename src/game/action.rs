/// Direction the snake is moving in
///
/// `None` is the resting state before the first input of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Whether a turn from `self` to `requested` is allowed.
    ///
    /// A vertical request needs the current vertical delta to be zero and a
    /// horizontal request needs the current horizontal delta to be zero, so
    /// the head can never reverse into the neck.
    pub fn accepts(&self, requested: Direction) -> bool {
        let (dx, dy) = self.delta();
        match requested {
            Direction::None => false,
            Direction::Up | Direction::Down => dy == 0,
            Direction::Left | Direction::Right => dx == 0,
        }
    }
}
