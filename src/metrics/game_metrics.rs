use std::time::{Duration, Instant};

use crate::game::GamePhase;

/// Play-time clock and session counter shown in the header
///
/// Time only accumulates while the game is running, so pausing or waiting
/// for the first move does not count.
pub struct GameMetrics {
    last_update: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
        }
    }

    pub fn update(&mut self, phase: GamePhase) {
        self.update_at(phase, Instant::now());
    }

    pub fn update_at(&mut self, phase: GamePhase, now: Instant) {
        if phase == GamePhase::Running {
            self.elapsed_time += now.saturating_duration_since(self.last_update);
        }
        self.last_update = now;
    }

    pub fn on_game_start(&mut self) {
        self.last_update = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self) {
        self.games_played += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
