//! Core domain types for 2048: grid coordinates and slide directions.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 4;

/// A cell on the board, addressed by row and column (0-indexed).
///
/// Row 0 is the top row and column 0 the left column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// Row index, `0..BOARD_SIZE`.
    pub row: usize,
    /// Column index, `0..BOARD_SIZE`.
    pub col: usize,
}

impl Coordinate {
    /// Creates a coordinate, panicking if it lies outside the board.
    ///
    /// Out-of-range coordinates are a programming error; callers holding
    /// untrusted indices should use [`Coordinate::try_new`].
    #[track_caller]
    pub fn new(row: usize, col: usize) -> Self {
        match Self::try_new(row, col) {
            Ok(coord) => coord,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a coordinate, rejecting positions outside the board.
    pub fn try_new(row: usize, col: usize) -> Result<Self, CoordinateError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(CoordinateError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Iterates every coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Coordinate { row, col }))
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Error raised for a coordinate outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CoordinateError {
    /// Row or column is not in `0..BOARD_SIZE`.
    #[display("Coordinate ({}, {}) is outside the {}x{} board", row, col, BOARD_SIZE, BOARD_SIZE)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}

/// Direction in which every tile on the board slides.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the cells of one line, ordered from the destination wall inward.
    ///
    /// `index` selects the row for Left/Right and the column for Up/Down.
    #[instrument(level = "trace")]
    pub fn line(self, index: usize) -> [Coordinate; BOARD_SIZE] {
        std::array::from_fn(|step| {
            let far = BOARD_SIZE - 1 - step;
            match self {
                Direction::Left => Coordinate::new(index, step),
                Direction::Right => Coordinate::new(index, far),
                Direction::Up => Coordinate::new(step, index),
                Direction::Down => Coordinate::new(far, index),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_try_new_rejects_out_of_bounds() {
        assert!(Coordinate::try_new(3, 3).is_ok());
        assert_eq!(
            Coordinate::try_new(4, 0),
            Err(CoordinateError::OutOfBounds { row: 4, col: 0 })
        );
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_new_panics_out_of_bounds() {
        let _ = Coordinate::new(0, BOARD_SIZE);
    }

    #[test]
    fn test_all_is_row_major() {
        let coords: Vec<_> = Coordinate::all().collect();
        assert_eq!(coords.len(), BOARD_SIZE * BOARD_SIZE);
        assert_eq!(coords[0], Coordinate::new(0, 0));
        assert_eq!(coords[1], Coordinate::new(0, 1));
        assert_eq!(coords[BOARD_SIZE], Coordinate::new(1, 0));
    }

    #[test]
    fn test_line_starts_at_wall() {
        assert_eq!(Direction::Right.line(2)[0], Coordinate::new(2, 3));
        assert_eq!(Direction::Left.line(2)[0], Coordinate::new(2, 0));
        assert_eq!(Direction::Up.line(1)[0], Coordinate::new(0, 1));
        assert_eq!(Direction::Down.line(1)[3], Coordinate::new(0, 1));
    }

    #[test]
    fn test_direction_parses_case_insensitive() {
        assert_eq!(Direction::from_str("LEFT"), Ok(Direction::Left));
        assert_eq!(Direction::from_str("up"), Ok(Direction::Up));
        assert!(Direction::from_str("sideways").is_err());
        assert_eq!(Direction::Down.to_string(), "down");
    }
}
