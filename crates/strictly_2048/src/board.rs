//! The value grid: the single source of truth for tile placement.

use super::types::{BOARD_SIZE, Coordinate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// NxN grid of tile values.
///
/// A cell holds 0 when empty, otherwise a power of two of at least 2.
/// Cloning produces an independent deep copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order.
    cells: [[u32; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[0; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Creates a board from explicit rows (row 0 first).
    pub fn from_rows(cells: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Returns the value at `coord` (0 when empty).
    pub fn cell_value(&self, coord: Coordinate) -> u32 {
        self.cells[coord.row][coord.col]
    }

    /// Writes `value` into the cell at `coord`.
    pub fn set_cell(&mut self, coord: Coordinate, value: u32) {
        self.cells[coord.row][coord.col] = value;
    }

    /// Returns every empty cell in row-major order.
    #[instrument(level = "trace", skip(self))]
    pub fn empty_coordinates(&self) -> Vec<Coordinate> {
        Coordinate::all()
            .filter(|coord| self.cell_value(*coord) == 0)
            .collect()
    }

    /// Returns the rows of the grid.
    pub fn rows(&self) -> &[[u32; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Iterates every non-zero tile value in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().flatten().copied().filter(|v| *v != 0)
    }

    /// Number of occupied cells.
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Checks if no cell is empty.
    pub fn is_full(&self) -> bool {
        self.tile_count() == BOARD_SIZE * BOARD_SIZE
    }

    /// Largest tile on the board, 0 for an empty board.
    pub fn max_tile(&self) -> u32 {
        self.tiles().max().unwrap_or(0)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.max_tile().max(2).to_string().len();
        for (i, row) in self.cells.iter().enumerate() {
            let line = row
                .iter()
                .map(|v| match v {
                    0 => format!("{:>width$}", "."),
                    v => format!("{:>width$}", v),
                })
                .collect::<Vec<_>>()
                .join(" ");
            f.write_str(&line)?;
            if i + 1 < BOARD_SIZE {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
