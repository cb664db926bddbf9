//! Score monotonicity invariant over the undo history.

use super::super::Session;
use super::Invariant;

/// Invariant: snapshot scores never decrease from bottom to top, and the
/// live score is at least the newest snapshot's.
///
/// Forward play only ever adds merge gains, and undo pops whole snapshots,
/// so any ordering break means a snapshot was recorded out of turn.
pub struct HistoryScoresMonotonic;

impl<R> Invariant<Session<R>> for HistoryScoresMonotonic {
    fn holds(session: &Session<R>) -> bool {
        let states = session.history().states();
        let ordered = states.windows(2).all(|w| w[0].score() <= w[1].score());
        let live = states
            .last()
            .is_none_or(|top| top.score() <= session.score());
        ordered && live
    }

    fn description() -> &'static str {
        "History scores are non-decreasing and bounded by the live score"
    }
}
