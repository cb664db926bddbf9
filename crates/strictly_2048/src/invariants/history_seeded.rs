//! History seeding invariant: the opening position is never popped.

use super::super::Session;
use super::Invariant;

/// Invariant: history always holds at least the opening position, scored 0.
pub struct HistorySeeded;

impl<R> Invariant<Session<R>> for HistorySeeded {
    fn holds(session: &Session<R>) -> bool {
        session
            .history()
            .states()
            .first()
            .is_some_and(|opening| opening.score() == 0)
    }

    fn description() -> &'static str {
        "History keeps the opening position at score 0"
    }
}
