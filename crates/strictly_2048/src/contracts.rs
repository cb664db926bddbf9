//! Contract-based validation for moves.
//!
//! Contracts formalize the Hoare-style reasoning {P} move {Q}: the
//! precondition gates which inputs the session accepts, the postconditions
//! relate the board before and after the move engine ran.

use super::action::{MoveOutcome, TileOp};
use super::board::Board;
use super::error::SessionError;
use super::invariants::{InvariantSet, SessionInvariants};
use super::session::{Phase, Session};
use super::types::Direction;
use std::collections::HashSet;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the session must still be accepting moves.
pub struct SessionIsPlaying;

impl SessionIsPlaying {
    /// Rejects input once the session reached game over.
    pub fn check<R>(session: &Session<R>) -> Result<(), SessionError> {
        if session.phase() == Phase::GameOver {
            Err(SessionError::GameOver)
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Postconditions
// ─────────────────────────────────────────────────────────────

/// Postcondition: tiles are only created or destroyed by doubling a pair.
///
/// The multiset of tiles before the move, with every merged pair replaced by
/// its sum, equals the multiset after the move.
pub struct TilesConserved;

impl TilesConserved {
    /// Checks tile conservation across one move.
    #[instrument(skip_all)]
    pub fn check(before: &Board, after: &Board, outcome: &MoveOutcome) -> Result<(), SessionError> {
        let mut expected: Vec<u32> = before.tiles().collect();
        for (value, _) in outcome.merges() {
            for _ in 0..2 {
                let half = value / 2;
                match expected.iter().position(|v| *v == half) {
                    Some(i) => {
                        expected.swap_remove(i);
                    }
                    None => {
                        return Err(SessionError::InvariantViolation(format!(
                            "Merge into {} has no {} tiles to consume",
                            value, half
                        )));
                    }
                }
            }
            expected.push(value);
        }

        let mut actual: Vec<u32> = after.tiles().collect();
        expected.sort_unstable();
        actual.sort_unstable();

        if expected == actual {
            Ok(())
        } else {
            warn!(?expected, ?actual, "Tile conservation violated");
            Err(SessionError::InvariantViolation(
                "Tiles were created or destroyed outside a merge".to_string(),
            ))
        }
    }
}

/// Postcondition: the score gained equals the sum of merged values.
pub struct ScoreMatchesMerges;

impl ScoreMatchesMerges {
    /// Checks that the reported gain adds up.
    pub fn check(outcome: &MoveOutcome) -> Result<(), SessionError> {
        let merged: u32 = outcome.merges().map(|(value, _)| value).sum();
        if merged == outcome.score_gained {
            Ok(())
        } else {
            Err(SessionError::InvariantViolation(format!(
                "Score gained {} differs from merged total {}",
                outcome.score_gained, merged
            )))
        }
    }
}

/// Postcondition: no tile takes part in more than one operation per move.
pub struct SingleMergePerTile;

impl SingleMergePerTile {
    /// Checks that every source coordinate appears at most once.
    pub fn check(outcome: &MoveOutcome) -> Result<(), SessionError> {
        let mut seen = HashSet::new();
        for op in &outcome.ops {
            let sources: &[_] = match op {
                TileOp::Slide { from, .. } => std::slice::from_ref(from),
                TileOp::Merge { from, .. } => from,
                TileOp::Spawn { .. } => &[],
            };
            for source in sources {
                if !seen.insert(*source) {
                    return Err(SessionError::InvariantViolation(format!(
                        "Tile at {} moved or merged twice",
                        source
                    )));
                }
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for directional moves.
///
/// Preconditions:
/// - Session is still playing
///
/// Postconditions:
/// - Tiles are conserved up to merges
/// - Score gain matches merged values
/// - Each tile moves or merges at most once
pub struct MoveContract;

impl MoveContract {
    /// Checks preconditions before running the move engine.
    pub fn pre<R>(session: &Session<R>, _direction: &Direction) -> Result<(), SessionError> {
        SessionIsPlaying::check(session)
    }

    /// Checks postconditions after the move engine ran.
    pub fn post(before: &Board, after: &Board, outcome: &MoveOutcome) -> Result<(), SessionError> {
        TilesConserved::check(before, after, outcome)?;
        ScoreMatchesMerges::check(outcome)?;
        SingleMergePerTile::check(outcome)?;
        Ok(())
    }
}

/// Asserts that all session invariants hold (panic on violation in debug builds).
pub fn assert_invariants<R>(session: &Session<R>) {
    if cfg!(debug_assertions)
        && let Err(violations) = SessionInvariants::check_all(session)
    {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        panic!("Session invariants violated: {}", descriptions);
    }
}
