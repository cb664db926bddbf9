//! Random tile placement.

use super::action::TileOp;
use super::board::Board;
use super::types::Coordinate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default probability that a spawned tile is a 4 instead of a 2.
pub const FOUR_SPAWN_CHANCE: f64 = 0.10;

/// Result of a spawn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnOutcome {
    /// A tile was placed.
    Spawned {
        /// Cell that received the tile.
        at: Coordinate,
        /// Value placed (2 or 4).
        value: u32,
    },
    /// No empty cell was left; nothing was placed.
    BoardFull,
}

impl SpawnOutcome {
    /// Converts a successful spawn into the tile operation reported to views.
    pub fn as_op(&self) -> Option<TileOp> {
        match self {
            SpawnOutcome::Spawned { at, value } => Some(TileOp::Spawn {
                at: *at,
                value: *value,
            }),
            SpawnOutcome::BoardFull => None,
        }
    }
}

/// Places new tiles using an injected random source.
///
/// Any [`Rng`] works; tests pass a seeded `StdRng` for reproducible runs.
#[derive(Debug, Clone)]
pub struct TileSpawner<R> {
    rng: R,
    four_chance: f64,
}

impl<R: Rng> TileSpawner<R> {
    /// Creates a spawner with the default 4-tile probability.
    pub fn new(rng: R) -> Self {
        Self::with_four_chance(rng, FOUR_SPAWN_CHANCE)
    }

    /// Creates a spawner with a custom 4-tile probability in `[0, 1]`.
    pub fn with_four_chance(rng: R, four_chance: f64) -> Self {
        Self { rng, four_chance }
    }

    /// Probability that a spawned tile is a 4.
    pub fn four_chance(&self) -> f64 {
        self.four_chance
    }

    /// Places a 2 (or, rarely, a 4) on a uniformly chosen empty cell.
    #[instrument(skip(self, board))]
    pub fn spawn(&mut self, board: &mut Board) -> SpawnOutcome {
        let empty = board.empty_coordinates();
        if empty.is_empty() {
            debug!("No empty cell to spawn into");
            return SpawnOutcome::BoardFull;
        }

        let at = empty[self.rng.random_range(0..empty.len())];
        let value = if self.rng.random::<f64>() < self.four_chance {
            4
        } else {
            2
        };
        board.set_cell(at, value);
        debug!(%at, value, "Spawned tile");

        SpawnOutcome::Spawned { at, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BOARD_SIZE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawn_fills_an_empty_cell() {
        let mut spawner = TileSpawner::new(StdRng::seed_from_u64(7));
        let mut board = Board::new();

        match spawner.spawn(&mut board) {
            SpawnOutcome::Spawned { at, value } => {
                assert!(value == 2 || value == 4);
                assert_eq!(board.cell_value(at), value);
                assert_eq!(board.tile_count(), 1);
            }
            SpawnOutcome::BoardFull => panic!("Empty board cannot be full"),
        }
    }

    #[test]
    fn test_spawn_only_targets_empty_cells() {
        let mut spawner = TileSpawner::new(StdRng::seed_from_u64(11));
        let mut board = Board::new();
        for _ in 0..BOARD_SIZE * BOARD_SIZE {
            let before = board.clone();
            if let SpawnOutcome::Spawned { at, .. } = spawner.spawn(&mut board) {
                assert_eq!(before.cell_value(at), 0);
            }
        }
        assert!(board.is_full());
        assert_eq!(spawner.spawn(&mut board), SpawnOutcome::BoardFull);
    }

    #[test]
    fn test_full_board_is_untouched() {
        let mut spawner = TileSpawner::new(StdRng::seed_from_u64(3));
        let mut board = Board::from_rows([[2; BOARD_SIZE]; BOARD_SIZE]);
        let before = board.clone();
        assert_eq!(spawner.spawn(&mut board), SpawnOutcome::BoardFull);
        assert_eq!(board, before);
    }

    #[test]
    fn test_four_chance_extremes() {
        let mut always_four = TileSpawner::with_four_chance(StdRng::seed_from_u64(1), 1.0);
        let mut never_four = TileSpawner::with_four_chance(StdRng::seed_from_u64(1), 0.0);
        for _ in 0..8 {
            let mut board = Board::new();
            assert!(matches!(
                always_four.spawn(&mut board),
                SpawnOutcome::Spawned { value: 4, .. }
            ));
            let mut board = Board::new();
            assert!(matches!(
                never_four.spawn(&mut board),
                SpawnOutcome::Spawned { value: 2, .. }
            ));
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let run = |seed| {
            let mut spawner = TileSpawner::new(StdRng::seed_from_u64(seed));
            let mut board = Board::new();
            (0..6).map(|_| spawner.spawn(&mut board)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
