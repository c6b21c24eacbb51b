use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::game::GameEvent;

/// How long a notification stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    GameOver,
    Victory,
    NewRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}

/// Score and best-score text slots plus the notification toasts
#[derive(Debug, Clone)]
pub struct Hud {
    score: String,
    high_score: String,
    notices: VecDeque<Notice>,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            score: "0".to_string(),
            high_score: "0".to_string(),
            notices: VecDeque::new(),
        }
    }

    pub fn apply(&mut self, event: &GameEvent) {
        self.apply_at(event, Instant::now());
    }

    pub fn apply_at(&mut self, event: &GameEvent, now: Instant) {
        match *event {
            GameEvent::ScoreChanged(score) => self.score = score.to_string(),
            GameEvent::HighScoreChanged(score) => self.high_score = score.to_string(),
            GameEvent::GameOver { final_score } => self.push(
                NoticeKind::GameOver,
                format!("Game over! Your score: {}", final_score),
                now,
            ),
            GameEvent::Victory { final_score } => self.push(
                NoticeKind::Victory,
                format!("You filled the board! Score: {}", final_score),
                now,
            ),
            GameEvent::NewRecord { .. } => {
                self.push(NoticeKind::NewRecord, "New high score! 🎉".to_string(), now)
            }
        }
    }

    fn push(&mut self, kind: NoticeKind, message: String, shown_at: Instant) {
        self.notices.push_back(Notice {
            kind,
            message,
            shown_at,
        });
    }

    /// Drop notifications older than [`NOTICE_TTL`]
    pub fn expire(&mut self, now: Instant) {
        self.notices
            .retain(|notice| now.saturating_duration_since(notice.shown_at) < NOTICE_TTL);
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn high_score(&self) -> &str {
        &self.high_score
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}
