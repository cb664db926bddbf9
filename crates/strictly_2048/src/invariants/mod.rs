//! Board and history properties checked after every accepted move.
//!
//! Each property is a zero-sized type implementing [`Invariant`] for the
//! state it inspects: a bare [`Board`](crate::Board) or a whole
//! [`Session`](crate::Session). Tuples of them form an [`InvariantSet`] so
//! the session can run them all in one call.

/// A property of `S` that every reachable state satisfies.
pub trait Invariant<S> {
    /// Returns `true` when `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// Short sentence naming the property, used in violation reports.
    fn description() -> &'static str;
}

/// A failed [`Invariant`], carrying its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// What the broken property promises.
    pub description: String,
}

impl InvariantViolation {
    /// Wraps an invariant description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Several invariants over the same state, checked together.
pub trait InvariantSet<S> {
    /// Runs every member and collects the ones that fail.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check_one<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn into_result(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        check_one::<S, I2>(state, &mut violations);
        check_one::<S, I3>(state, &mut violations);
        into_result(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        check_one::<S, I2>(state, &mut violations);
        into_result(violations)
    }
}

pub mod history_scores;
pub mod history_seeded;
pub mod power_of_two;

pub use history_scores::HistoryScoresMonotonic;
pub use history_seeded::HistorySeeded;
pub use power_of_two::PowerOfTwoTiles;

/// Everything [`Session`](crate::Session) checks after a move.
pub type SessionInvariants = (PowerOfTwoTiles, HistorySeeded, HistoryScoresMonotonic);
