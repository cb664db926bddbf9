//! Undo history: a stack of board/score snapshots.

use super::board::Board;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// An immutable snapshot of the board and score at one point in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct GameState {
    board: Board,
    score: u32,
}

impl GameState {
    /// Returns the captured board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the captured score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Splits the snapshot into its board and score.
    pub fn into_parts(self) -> (Board, u32) {
        (self.board, self.score)
    }
}

/// Error raised by history operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum HistoryError {
    /// Only the initial snapshot remains; there is nothing to undo.
    #[display("No earlier state to undo to")]
    EmptyHistory,
}

/// LIFO stack of snapshots with a permanent bottom entry.
///
/// The bottom entry is the session's opening position and is never popped,
/// so the stack is never empty during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    states: Vec<GameState>,
}

impl History {
    /// Creates a history whose bottom entry is `initial`.
    #[instrument(skip(initial))]
    pub fn seeded(initial: GameState) -> Self {
        Self {
            states: vec![initial],
        }
    }

    /// Pushes the state captured before a board-changing move.
    pub fn push(&mut self, state: GameState) {
        self.states.push(state);
        debug!(depth = self.states.len(), "Pushed snapshot");
    }

    /// Pops the most recent snapshot, refusing to remove the bottom entry.
    #[instrument(skip(self), fields(depth = self.states.len()))]
    pub fn pop(&mut self) -> Result<GameState, HistoryError> {
        if !self.can_undo() {
            warn!("Undo requested with no prior state");
            return Err(HistoryError::EmptyHistory);
        }
        self.states.pop().ok_or(HistoryError::EmptyHistory)
    }

    /// Most recent snapshot (the bottom entry when nothing was pushed).
    pub fn peek(&self) -> Option<&GameState> {
        self.states.last()
    }

    /// Number of snapshots, including the bottom entry.
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// Whether a pop would succeed.
    pub fn can_undo(&self) -> bool {
        self.states.len() > 1
    }

    /// Snapshots from bottom to top.
    pub fn states(&self) -> &[GameState] {
        &self.states
    }
}
