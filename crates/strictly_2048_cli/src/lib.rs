//! Terminal front end for strictly_2048.
//!
//! The front end is made of [`SessionObserver`](strictly_2048::SessionObserver)s
//! subscribed to a session: the [`Hud`] keeps score and the persisted high
//! score, the [`TextView`] logs events as text or JSON lines.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod hud;
mod input;
mod store;
mod view;

pub use hud::{HIGH_SCORE_KEY, Hud};
pub use input::{AUTO_CYCLE, INPUT_HELP, PlayerInput, auto_direction};
pub use store::{MemoryStore, ScoreStore, StoreError, TomlFileStore};
pub use view::{TextView, ViewMode};
