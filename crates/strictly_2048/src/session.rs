//! Session controller: turn sequencing, undo and notifications.
//!
//! A [`Session`] owns the live board, the score, the undo history and the
//! spawn random source. Each accepted input is processed to completion
//! before the call returns; views learn about the result through
//! [`SessionEvent`]s, either from the returned [`TurnReport`] or by
//! subscribing a [`SessionObserver`].

use super::action::TileOp;
use super::board::Board;
use super::config::{ConfigError, SessionConfig};
use super::contracts::{MoveContract, assert_invariants};
use super::engine;
use super::error::SessionError;
use super::history::{GameState, History};
use super::spawner::{SpawnOutcome, TileSpawner};
use super::types::Direction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Phase of the session state machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum Phase {
    /// Moves are accepted.
    #[default]
    Playing,
    /// No move can change the board.
    GameOver,
}

/// Notification emitted to view and HUD collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Tiles slid, merged or spawned.
    TilesChanged(Vec<TileOp>),
    /// The whole board was replaced (undo or reset); views rebuild every tile.
    BoardRestored(Board),
    /// The score now has this value.
    ScoreChanged(u32),
    /// Whether Undo can currently succeed.
    UndoAvailabilityChanged(bool),
    /// The session entered [`Phase::GameOver`].
    GameOver,
}

/// Receives session notifications.
pub trait SessionObserver {
    /// Called once per event, in emission order.
    fn notify(&mut self, event: &SessionEvent);
}

impl<T: SessionObserver> SessionObserver for std::rc::Rc<std::cell::RefCell<T>> {
    fn notify(&mut self, event: &SessionEvent) {
        self.borrow_mut().notify(event);
    }
}

/// Outcome of one accepted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Whether the board or score changed.
    pub changed: bool,
    /// Score gained from merges this turn.
    pub score_gained: u32,
    /// Score after the turn.
    pub score: u32,
    /// Phase after the turn.
    pub phase: Phase,
    /// Tile operations, including any spawn.
    pub ops: Vec<TileOp>,
    /// Events delivered to observers, in order.
    pub events: Vec<SessionEvent>,
}

impl TurnReport {
    fn unchanged(score: u32, phase: Phase) -> Self {
        Self {
            changed: false,
            score_gained: 0,
            score,
            phase,
            ops: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// One play-through of the board, from opening spawns to game over.
pub struct Session<R = StdRng> {
    board: Board,
    score: u32,
    phase: Phase,
    history: History,
    spawner: TileSpawner<R>,
    config: SessionConfig,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<R> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("board", &self.board)
            .field("score", &self.score)
            .field("phase", &self.phase)
            .field("history_depth", &self.history.depth())
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session<StdRng> {
    /// Creates a session seeded from the config, or from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config fails validation.
    #[instrument(skip(config))]
    pub fn from_config(config: SessionConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(config, rng)
    }
}

impl<R: Rng> Session<R> {
    /// Creates a session and spawns the opening tiles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config fails validation.
    #[instrument(skip(config, rng))]
    pub fn new(config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = TileSpawner::with_four_chance(rng, *config.four_spawn_chance());
        let mut session = Self {
            board: Board::new(),
            score: 0,
            phase: Phase::Playing,
            history: History::seeded(GameState::new(Board::new(), 0)),
            spawner,
            config,
            observers: Vec::new(),
        };
        session.open();
        info!(board = %session.board, "Session started");
        Ok(session)
    }

    /// Places the opening tiles on an empty board and seeds history.
    fn open(&mut self) -> Vec<TileOp> {
        self.board = Board::new();
        self.score = 0;
        self.phase = Phase::Playing;

        let ops = (0..*self.config.initial_tiles())
            .filter_map(|_| self.spawner.spawn(&mut self.board).as_op())
            .collect();

        self.history = History::seeded(GameState::new(self.board.clone(), 0));
        if !engine::has_moves(&self.board) {
            self.phase = Phase::GameOver;
        }
        ops
    }

    /// Registers an observer for all future events.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Slides the board toward `direction` and advances the turn.
    ///
    /// A move that changes nothing leaves the session untouched and emits no
    /// events. A changing move is recorded in history, adds its merge score,
    /// and spawns a tile; the session ends when no empty cell or legal move
    /// remains.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::GameOver`] if the session already ended, or
    /// [`SessionError::InvariantViolation`] if a debug-build postcondition fails.
    #[instrument(skip(self), fields(score = self.score))]
    pub fn apply_move(&mut self, direction: Direction) -> Result<TurnReport, SessionError> {
        MoveContract::pre(self, &direction)?;

        let before = GameState::new(self.board.clone(), self.score);
        let mut board = self.board.clone();
        let outcome = engine::slide(&mut board, direction);

        if !outcome.changed {
            debug!("Move changed nothing");
            return Ok(TurnReport::unchanged(self.score, self.phase));
        }

        #[cfg(debug_assertions)]
        MoveContract::post(before.board(), &board, &outcome)?;

        self.board = board;

        self.history.push(before);
        self.score += outcome.score_gained;

        let mut ops = outcome.ops;
        let spawn = self.spawner.spawn(&mut self.board);
        ops.extend(spawn.as_op());

        let mut events = vec![SessionEvent::TilesChanged(ops.clone())];
        if outcome.score_gained > 0 {
            events.push(SessionEvent::ScoreChanged(self.score));
        }
        events.push(SessionEvent::UndoAvailabilityChanged(true));

        let stuck = match spawn {
            SpawnOutcome::BoardFull => true,
            SpawnOutcome::Spawned { .. } => !engine::has_moves(&self.board),
        };
        if stuck {
            events.extend(self.enter_game_over());
        }

        assert_invariants(self);
        self.dispatch(&events);

        Ok(TurnReport {
            changed: true,
            score_gained: outcome.score_gained,
            score: self.score,
            phase: self.phase,
            ops,
            events,
        })
    }

    /// Restores the board and score captured before the last changing move.
    ///
    /// From [`Phase::GameOver`] this is only allowed when the config permits
    /// it, and returns the session to [`Phase::Playing`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyHistory`] when only the opening position
    /// remains and [`SessionError::UndoDisabled`] when the policy forbids
    /// undoing a finished game. Neither touches board or score.
    #[instrument(skip(self), fields(depth = self.history.depth()))]
    pub fn undo(&mut self) -> Result<TurnReport, SessionError> {
        if self.phase == Phase::GameOver && !*self.config.undo_after_game_over() {
            warn!("Undo rejected after game over");
            return Err(SessionError::UndoDisabled);
        }

        let (board, score) = self.history.pop()?.into_parts();
        self.board = board;
        self.score = score;
        if self.phase == Phase::GameOver {
            info!("Undo recovered a finished game");
            self.phase = Phase::Playing;
        }

        let events = vec![
            SessionEvent::BoardRestored(self.board.clone()),
            SessionEvent::ScoreChanged(self.score),
            SessionEvent::UndoAvailabilityChanged(self.history.can_undo()),
        ];

        assert_invariants(self);
        self.dispatch(&events);

        Ok(TurnReport {
            changed: true,
            score_gained: 0,
            score: self.score,
            phase: self.phase,
            ops: Vec::new(),
            events,
        })
    }

    /// Ends the session if no direction can change the board.
    ///
    /// Returns whether the session is over.
    #[instrument(skip(self))]
    pub fn check_game_over(&mut self) -> bool {
        if self.phase == Phase::Playing && !engine::has_moves(&self.board) {
            let events = self.enter_game_over();
            self.dispatch(events.as_slice());
        }
        self.phase == Phase::GameOver
    }

    /// Discards all state and starts over with fresh opening tiles.
    ///
    /// Configuration, random source and observers are kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> TurnReport {
        info!(final_score = self.score, "Resetting session");
        let ops = self.open();

        let mut events = vec![
            SessionEvent::BoardRestored(self.board.clone()),
            SessionEvent::ScoreChanged(0),
            SessionEvent::UndoAvailabilityChanged(false),
        ];
        if self.phase == Phase::GameOver {
            events.push(SessionEvent::GameOver);
        }
        self.dispatch(&events);

        TurnReport {
            changed: true,
            score_gained: 0,
            score: 0,
            phase: self.phase,
            ops,
            events,
        }
    }

    fn enter_game_over(&mut self) -> Option<SessionEvent> {
        if self.phase == Phase::GameOver {
            return None;
        }
        info!(score = self.score, max_tile = self.board.max_tile(), "Game over");
        self.phase = Phase::GameOver;
        Some(SessionEvent::GameOver)
    }

    fn dispatch(&mut self, events: &[SessionEvent]) {
        for observer in &mut self.observers {
            for event in events {
                observer.notify(event);
            }
        }
    }
}

impl<R> Session<R> {
    /// Returns the live board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether Undo would currently succeed.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
            && (self.phase == Phase::Playing || *self.config.undo_after_game_over())
    }

    /// Captures the live board and score.
    pub fn snapshot(&self) -> GameState {
        GameState::new(self.board.clone(), self.score)
    }

    /// Directions that would change the board.
    pub fn legal_directions(&self) -> Vec<Direction> {
        engine::legal_directions(&self.board)
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BOARD_SIZE;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<SessionEvent>>>);

    impl SessionObserver for Recorder {
        fn notify(&mut self, event: &SessionEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn seeded(seed: u64) -> Session {
        Session::from_config(SessionConfig::default().with_seed(seed)).expect("Valid config")
    }

    #[test]
    fn test_new_session_has_two_tiles() {
        let session = seeded(1);
        assert_eq!(session.board().tile_count(), 2);
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.history().depth(), 1);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_noop_move_emits_nothing() {
        let mut session = seeded(2);
        *session.board_mut() = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = session.snapshot();

        let report = session.apply_move(Direction::Left).expect("Playing");
        assert!(!report.changed);
        assert!(report.events.is_empty());
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.history().depth(), 1);
    }

    #[test]
    fn test_changing_move_records_and_spawns() {
        let mut session = seeded(3);
        *session.board_mut() = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let events = Rc::new(RefCell::new(Vec::new()));
        session.subscribe(Box::new(Recorder(events.clone())));

        let report = session.apply_move(Direction::Right).expect("Playing");
        assert!(report.changed);
        assert_eq!(report.score_gained, 4);
        assert_eq!(session.score(), 4);
        assert_eq!(session.board().tile_count(), 2);
        assert_eq!(session.history().depth(), 2);
        assert!(matches!(report.ops.last(), Some(TileOp::Spawn { .. })));
        assert_eq!(*events.borrow(), report.events);
        assert!(events.borrow().contains(&SessionEvent::ScoreChanged(4)));
        assert!(
            events
                .borrow()
                .contains(&SessionEvent::UndoAvailabilityChanged(true))
        );
    }

    #[test]
    fn test_stalemate_after_spawn_ends_game() {
        let mut session = Session::new(
            SessionConfig::default().with_four_spawn_chance(0.0),
            StdRng::seed_from_u64(4),
        )
        .expect("Valid config");
        // The merge frees exactly one cell; the spawned 2 fills it and no
        // neighbouring pair is left.
        *session.board_mut() = Board::from_rows([
            [2, 2, 8, 16],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
            [32, 64, 128, 256],
        ]);

        let report = session.apply_move(Direction::Left).expect("Playing");
        assert_eq!(session.board().rows()[0], [4, 8, 16, 2]);
        assert_eq!(report.score, 4);
        assert_eq!(report.phase, Phase::GameOver);
        assert_eq!(report.events.last(), Some(&SessionEvent::GameOver));

        let report = session.undo().expect("Undo allowed after game over");
        assert_eq!(report.phase, Phase::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.board().rows()[0], [2, 2, 8, 16]);
    }

    #[test]
    fn test_check_game_over_on_locked_board() {
        let mut session = seeded(5);
        *session.board_mut() = Board::from_rows([
            [2, 4, 8, 16],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        for direction in Direction::ALL {
            let report = session.apply_move(direction).expect("Still playing");
            assert!(!report.changed);
        }
        assert!(session.check_game_over());
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.apply_move(Direction::Up), Err(SessionError::GameOver));
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut session = seeded(6);
        *session.board_mut() = Board::from_rows([
            [2, 4, 8, 16],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        let events = Rc::new(RefCell::new(Vec::new()));
        session.subscribe(Box::new(Recorder(events.clone())));

        assert!(session.check_game_over());
        assert!(session.check_game_over());
        let over_count = events
            .borrow()
            .iter()
            .filter(|e| **e == SessionEvent::GameOver)
            .count();
        assert_eq!(over_count, 1);
    }

    #[test]
    fn test_reset_starts_fresh() {
        let mut session = seeded(7);
        *session.board_mut() = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        session.apply_move(Direction::Left).expect("Playing");
        assert!(session.score() > 0);

        let report = session.reset();
        assert_eq!(session.score(), 0);
        assert_eq!(session.history().depth(), 1);
        assert_eq!(session.board().tile_count(), 2);
        assert!(report.events.contains(&SessionEvent::UndoAvailabilityChanged(false)));
        assert_eq!(session.board().empty_coordinates().len(), BOARD_SIZE * BOARD_SIZE - 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        for config in [
            SessionConfig::default().with_initial_tiles(0),
            SessionConfig::default().with_initial_tiles(40),
            SessionConfig::default().with_four_spawn_chance(1.5),
            SessionConfig::default().with_four_spawn_chance(f64::NAN),
        ] {
            assert!(Session::new(config, StdRng::seed_from_u64(1)).is_err());
        }
    }

    #[test]
    fn test_rejected_move_leaves_session_untouched() {
        let mut session = seeded(8);
        *session.board_mut() = Board::from_rows([
            [2, 4, 8, 16],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        assert!(session.check_game_over());
        let before = session.snapshot();
        let depth = session.history().depth();

        for direction in Direction::ALL {
            assert_eq!(session.apply_move(direction), Err(SessionError::GameOver));
            assert_eq!(session.snapshot(), before);
            assert_eq!(session.history().depth(), depth);
        }
    }

    #[test]
    fn test_postcondition_checked_on_candidate_board() {
        let mut session = seeded(9);
        let start = Board::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        *session.board_mut() = start.clone();

        let mut candidate = start.clone();
        let outcome = engine::slide(&mut candidate, Direction::Left);
        assert!(MoveContract::post(&start, &candidate, &outcome).is_ok());

        let report = session.apply_move(Direction::Left).expect("Playing");
        assert_eq!(report.score_gained, outcome.score_gained);
        assert_eq!(session.history().states().last().map(|s| s.board()), Some(&start));
        assert_eq!(session.board().rows()[0][..2], candidate.rows()[0][..2]);
    }
}
