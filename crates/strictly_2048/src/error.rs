//! Errors raised by the session controller.

use super::history::HistoryError;

/// Error that can occur when driving a session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// Undo was requested with only the opening position in history.
    #[display("No earlier state to undo to")]
    EmptyHistory,

    /// Undo was requested after game over while the policy forbids it.
    #[display("Undo is disabled once the game is over")]
    UndoDisabled,

    /// A move was requested after the game ended.
    #[display("Game is already over")]
    GameOver,

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for SessionError {}

impl From<HistoryError> for SessionError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::EmptyHistory => SessionError::EmptyHistory,
        }
    }
}
