//! First-class tile operations reported to the view layer.
//!
//! The core never animates anything. Instead every turn yields the list of
//! operations a presentation layer needs to replay it: slides, merges and
//! spawns, all addressed by coordinate.

use super::types::Coordinate;
use serde::{Deserialize, Serialize};

/// A single visible change to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TileOp {
    /// A tile moved without combining.
    Slide {
        /// Position before the move.
        from: Coordinate,
        /// Position after the move.
        to: Coordinate,
    },
    /// Two equal tiles combined into one.
    Merge {
        /// Pre-move positions of both tiles, the one nearer the wall first.
        from: [Coordinate; 2],
        /// Cell holding the merged tile.
        to: Coordinate,
        /// Value of the merged tile.
        value: u32,
    },
    /// A new tile appeared on an empty cell.
    Spawn {
        /// Cell that received the tile.
        at: Coordinate,
        /// Value of the new tile (2 or 4).
        value: u32,
    },
}

impl std::fmt::Display for TileOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileOp::Slide { from, to } => write!(f, "slide {} -> {}", from, to),
            TileOp::Merge { from, to, value } => {
                write!(f, "merge {} + {} -> {} = {}", from[0], from[1], to, value)
            }
            TileOp::Spawn { at, value } => write!(f, "spawn {} at {}", value, at),
        }
    }
}

/// Result of running the move engine over a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Whether any cell differs from the pre-move board.
    pub changed: bool,
    /// Sum of the values produced by merges in this move.
    pub score_gained: u32,
    /// Slides and merges, in the order lines were processed.
    pub ops: Vec<TileOp>,
}

impl MoveOutcome {
    /// Iterates the merges of this move as `(value, sources)` pairs.
    pub fn merges(&self) -> impl Iterator<Item = (u32, [Coordinate; 2])> + '_ {
        self.ops.iter().filter_map(|op| match op {
            TileOp::Merge { from, value, .. } => Some((*value, *from)),
            _ => None,
        })
    }
}
