//! Heads-up display tracking score, high score and game status.

use crate::store::{ScoreStore, StoreError};
use derive_getters::Getters;
use strictly_2048::{SessionEvent, SessionObserver};
use tracing::{info, instrument, warn};

/// Store key the best score is persisted under.
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Session observer holding everything the status line shows.
///
/// The high score is loaded from the store once at construction and written
/// back every time the live score beats it.
#[derive(Debug, Getters)]
pub struct Hud<S> {
    #[getter(skip)]
    store: S,
    score: u32,
    high_score: u32,
    undo_available: bool,
    game_over: bool,
}

impl<S: ScoreStore> Hud<S> {
    /// Creates a HUD, reading the persisted high score from `store`.
    #[instrument(skip(store))]
    pub fn new(store: S) -> Result<Self, StoreError> {
        let high_score = store.get(HIGH_SCORE_KEY)?.unwrap_or(0);
        info!(high_score, "Loaded high score");
        Ok(Self {
            store,
            score: 0,
            high_score,
            undo_available: false,
            game_over: false,
        })
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// One-line status summary.
    pub fn status_line(&self) -> String {
        let mut line = format!("Score: {}  Best: {}", self.score, self.high_score);
        if self.undo_available {
            line.push_str("  [u]ndo");
        }
        if self.game_over {
            line.push_str("  GAME OVER");
        }
        line
    }

    fn record_score(&mut self, score: u32) {
        self.score = score;
        if score > self.high_score {
            self.high_score = score;
            if let Err(e) = self.store.set(HIGH_SCORE_KEY, score) {
                warn!(error = %e, "Failed to persist high score");
            }
        }
    }
}

impl<S: ScoreStore> SessionObserver for Hud<S> {
    fn notify(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ScoreChanged(score) => self.record_score(*score),
            SessionEvent::UndoAvailabilityChanged(available) => self.undo_available = *available,
            SessionEvent::GameOver => self.game_over = true,
            SessionEvent::BoardRestored(_) => self.game_over = false,
            SessionEvent::TilesChanged(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_status_line() {
        let mut hud = Hud::new(MemoryStore::new()).unwrap();
        hud.notify(&SessionEvent::ScoreChanged(24));
        hud.notify(&SessionEvent::UndoAvailabilityChanged(true));
        assert_eq!(hud.status_line(), "Score: 24  Best: 24  [u]ndo");

        hud.notify(&SessionEvent::GameOver);
        assert!(hud.status_line().ends_with("GAME OVER"));
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, 100).unwrap();

        let mut hud = Hud::new(store).unwrap();
        hud.notify(&SessionEvent::ScoreChanged(40));

        assert_eq!(*hud.score(), 40);
        assert_eq!(*hud.high_score(), 100);
        assert_eq!(hud.store().get(HIGH_SCORE_KEY).unwrap(), Some(100));
    }
}
