//! Tile value invariant: every occupied cell holds a power of two ≥ 2.

use super::super::{Board, Session};
use super::Invariant;

/// Invariant: every non-zero cell is a power of two of at least 2.
pub struct PowerOfTwoTiles;

impl Invariant<Board> for PowerOfTwoTiles {
    fn holds(board: &Board) -> bool {
        board.tiles().all(|v| v >= 2 && v.is_power_of_two())
    }

    fn description() -> &'static str {
        "Every tile is a power of two of at least 2"
    }
}

impl<R> Invariant<Session<R>> for PowerOfTwoTiles {
    fn holds(session: &Session<R>) -> bool {
        <Self as Invariant<Board>>::holds(session.board())
            && session
                .history()
                .states()
                .iter()
                .all(|state| <Self as Invariant<Board>>::holds(state.board()))
    }

    fn description() -> &'static str {
        <Self as Invariant<Board>>::description()
    }
}
