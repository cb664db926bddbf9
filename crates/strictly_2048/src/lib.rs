//! Strictly 2048 - pure board simulation for a 2048-style sliding puzzle.
//!
//! The crate is the deterministic core of the game: it applies directional
//! moves, merges tiles, keeps score, spawns new tiles and maintains an undo
//! history. Rendering, input and persistence live elsewhere and talk to the
//! core through [`SessionEvent`]s.
//!
//! # Architecture
//!
//! - **Board**: the value grid, the single source of truth
//! - **Engine**: slide/merge algorithm producing [`TileOp`]s for views
//! - **Spawner**: random tile placement behind an injectable [`rand::Rng`]
//! - **History**: undo stack of board/score snapshots
//! - **Session**: the Playing/GameOver state machine tying it together
//!
//! # Example
//!
//! ```
//! use strictly_2048::{Direction, Phase, Session, SessionConfig};
//!
//! let mut session = Session::from_config(SessionConfig::default().with_seed(42))
//!     .expect("Default config is valid");
//! let report = session.apply_move(Direction::Left).expect("Session just started");
//! assert_eq!(report.score, session.score());
//! assert_eq!(session.phase(), Phase::Playing);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod config;
mod contracts;
mod engine;
mod error;
mod history;
pub mod invariants;
mod session;
mod spawner;
mod types;

// Crate-level exports - Domain types
pub use board::Board;
pub use types::{BOARD_SIZE, Coordinate, CoordinateError, Direction};

// Crate-level exports - Move engine
pub use action::{MoveOutcome, TileOp};
pub use engine::{can_slide, has_moves, legal_directions, slide};

// Crate-level exports - Spawning
pub use spawner::{FOUR_SPAWN_CHANCE, SpawnOutcome, TileSpawner};

// Crate-level exports - History
pub use history::{GameState, History, HistoryError};

// Crate-level exports - Session
pub use config::{ConfigError, SessionConfig};
pub use contracts::{
    MoveContract, ScoreMatchesMerges, SessionIsPlaying, SingleMergePerTile, TilesConserved,
};
pub use error::SessionError;
pub use session::{Phase, Session, SessionEvent, SessionObserver, TurnReport};
