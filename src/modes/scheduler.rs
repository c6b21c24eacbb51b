use std::future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, Sleep};

/// One-shot timer that the game loop re-arms after every tick
///
/// Each tick is scheduled only once the previous tick and its render have
/// finished, so the cadence follows the engine's current delay instead of a
/// fixed rate.
#[derive(Debug, Default)]
pub struct TickScheduler {
    pending: Option<Pin<Box<Sleep>>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Arm the timer, replacing any tick already scheduled
    pub fn schedule(&mut self, delay: Duration) {
        self.pending = Some(Box::pin(sleep(delay)));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves when the scheduled tick is due
    ///
    /// Never resolves while nothing is scheduled. Dropping the future keeps
    /// the deadline, so it is safe to use in `tokio::select!`.
    pub async fn fired(&mut self) {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.as_mut().await;
                self.pending = None;
            }
            None => future::pending::<()>().await,
        }
    }
}
