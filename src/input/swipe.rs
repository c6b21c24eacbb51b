use crate::game::Direction;

/// Turn a gesture displacement into a direction
///
/// The axis with the larger magnitude wins; a tie counts as vertical. The
/// sign picks the way along that axis. Gestures shorter than `min_distance`
/// on both axes are dropped.
pub fn classify_swipe(dx: f64, dy: f64, min_distance: f64) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < min_distance {
        return None;
    }

    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Some(Direction::Right)
        } else if dx < 0.0 {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else if dy < 0.0 {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Tracks a single-pointer drag from press to release
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<(f64, f64)>,
    min_distance: f64,
}

impl SwipeTracker {
    pub fn new(min_distance: f64) -> Self {
        Self {
            start: None,
            min_distance,
        }
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// Finish the gesture; a release without a press yields nothing
    pub fn end(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (start_x, start_y) = self.start.take()?;
        classify_swipe(x - start_x, y - start_y, self.min_distance)
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}
