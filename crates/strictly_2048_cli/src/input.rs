//! Line commands typed at the play prompt.

use std::str::FromStr;
use strictly_2048::Direction;

/// A parsed player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Slide the board.
    Slide(Direction),
    /// Step back one move.
    Undo,
    /// Start a new game.
    Reset,
    /// Leave the game.
    Quit,
}

/// Help text listing the accepted commands.
pub const INPUT_HELP: &str =
    "commands: w/a/s/d or up/left/down/right, u(ndo), r(eset), q(uit)";

impl FromStr for PlayerInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim().to_ascii_lowercase();
        let input = match word.as_str() {
            "w" => PlayerInput::Slide(Direction::Up),
            "a" => PlayerInput::Slide(Direction::Left),
            "s" => PlayerInput::Slide(Direction::Down),
            "d" => PlayerInput::Slide(Direction::Right),
            "u" | "undo" => PlayerInput::Undo,
            "r" | "reset" => PlayerInput::Reset,
            "q" | "quit" => PlayerInput::Quit,
            other => Direction::from_str(other)
                .map(PlayerInput::Slide)
                .map_err(|_| format!("Unknown command '{}'", s.trim()))?,
        };
        Ok(input)
    }
}

/// Cycle order used by autoplay.
pub const AUTO_CYCLE: [Direction; 4] = [
    Direction::Left,
    Direction::Down,
    Direction::Right,
    Direction::Up,
];

/// Picks the autoplay direction for `turn`.
///
/// Starts at the cycle slot for `turn` and walks forward to the first
/// direction contained in `legal`. Returns `None` when nothing is legal.
pub fn auto_direction(turn: usize, legal: &[Direction]) -> Option<Direction> {
    (0..AUTO_CYCLE.len())
        .map(|offset| AUTO_CYCLE[(turn + offset) % AUTO_CYCLE.len()])
        .find(|direction| legal.contains(direction))
}
