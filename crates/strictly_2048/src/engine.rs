//! The move engine: directional slides and merges.
//!
//! Every line of the board (rows for Left/Right, columns for Up/Down) is
//! processed from the destination wall inward. A tile scans toward the wall
//! for the nearest occupied cell and either moves flush against the wall,
//! merges with an equal tile, or stops next to a different one. A merged
//! cell never merges again in the same move.

use super::action::{MoveOutcome, TileOp};
use super::board::Board;
use super::types::{BOARD_SIZE, Coordinate, Direction};
use tracing::{debug, instrument, trace};

/// A tile travelling along one line, indexed from the wall (0) inward.
#[derive(Debug, Clone, Copy)]
struct LineTile {
    value: u32,
    /// Line index the tile started the move at.
    origin: usize,
    /// Origin of the tile absorbed by this one, if it merged this move.
    absorbed: Option<usize>,
}

/// Collapses one line toward index 0, returning the score gained.
fn collapse(line: &mut [Option<LineTile>; BOARD_SIZE]) -> u32 {
    let mut gained = 0;
    let mut pos = 1;

    while pos < BOARD_SIZE {
        let Some(tile) = line[pos] else {
            pos += 1;
            continue;
        };

        let nearest = (0..pos)
            .rev()
            .find_map(|i| line[i].map(|occupant| (i, occupant)));

        match nearest {
            None => {
                line[0] = line[pos].take();
            }
            Some((probe, dest)) if dest.value == tile.value && dest.absorbed.is_none() => {
                let value = dest.value * 2;
                line[probe] = Some(LineTile {
                    value,
                    origin: dest.origin,
                    absorbed: Some(tile.origin),
                });
                line[pos] = None;
                gained += value;
                trace!(probe, pos, value, "Merged");

                // Tiles piled up behind the merge follow it toward the wall.
                let distance = pos - probe;
                for i in pos + 1..BOARD_SIZE {
                    if line[i].is_some() {
                        line[i - distance] = line[i].take();
                    }
                }

                // Resume just behind the merged cell so shifted tiles settle.
                pos = probe;
            }
            Some((probe, _)) => {
                if probe + 1 != pos {
                    line[probe + 1] = line[pos].take();
                }
            }
        }

        pos += 1;
    }

    gained
}

/// Slides every tile on `board` toward `direction`, merging equal pairs.
///
/// The board is mutated in place. A move that cannot change anything is a
/// no-op and reports `changed = false` with no score and no operations.
#[instrument(skip(board))]
pub fn slide(board: &mut Board, direction: Direction) -> MoveOutcome {
    let before = board.clone();
    let mut score_gained = 0;
    let mut ops = Vec::new();

    for index in 0..BOARD_SIZE {
        let coords = direction.line(index);
        let mut line: [Option<LineTile>; BOARD_SIZE] = std::array::from_fn(|i| {
            let value = board.cell_value(coords[i]);
            (value != 0).then_some(LineTile {
                value,
                origin: i,
                absorbed: None,
            })
        });

        score_gained += collapse(&mut line);

        for (i, slot) in line.iter().enumerate() {
            board.set_cell(coords[i], slot.map_or(0, |tile| tile.value));
            match slot {
                Some(LineTile {
                    value,
                    origin,
                    absorbed: Some(absorbed),
                }) => ops.push(TileOp::Merge {
                    from: [coords[*origin], coords[*absorbed]],
                    to: coords[i],
                    value: *value,
                }),
                Some(tile) if tile.origin != i => ops.push(TileOp::Slide {
                    from: coords[tile.origin],
                    to: coords[i],
                }),
                _ => {}
            }
        }
    }

    let changed = *board != before;
    debug!(changed, score_gained, ops = ops.len(), "Move applied");

    MoveOutcome {
        changed,
        score_gained,
        ops,
    }
}

/// Checks whether sliding toward `direction` would change the board.
pub fn can_slide(board: &Board, direction: Direction) -> bool {
    let mut probe = board.clone();
    slide(&mut probe, direction).changed
}

/// Directions that would change the board.
#[instrument(skip(board))]
pub fn legal_directions(board: &Board) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|direction| can_slide(board, *direction))
        .collect()
}

/// Checks whether any move is still possible.
///
/// True when a cell is empty or two orthogonally adjacent tiles are equal.
#[instrument(skip(board))]
pub fn has_moves(board: &Board) -> bool {
    if !board.is_full() {
        return true;
    }

    Coordinate::all().any(|coord| {
        let value = board.cell_value(coord);
        let right = coord.col + 1 < BOARD_SIZE
            && board.cell_value(Coordinate::new(coord.row, coord.col + 1)) == value;
        let below = coord.row + 1 < BOARD_SIZE
            && board.cell_value(Coordinate::new(coord.row + 1, coord.col)) == value;
        right || below
    })
}
