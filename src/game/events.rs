/// Presentation events raised by the engine
///
/// The engine only queues these; the host decides how to show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Current score changed (also raised on start and restart)
    ScoreChanged(u32),
    /// Best score changed (also raised once after loading it)
    HighScoreChanged(u32),
    /// The snake collided
    GameOver { final_score: u32 },
    /// The snake filled the whole board
    Victory { final_score: u32 },
    /// The finished game beat the previous best
    NewRecord { score: u32 },
}
