//! Event log view writing session events as text or JSON lines.

use std::io::Write;
use strictly_2048::{SessionEvent, SessionObserver};
use tracing::warn;

/// Output format for [`TextView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewMode {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Session observer that writes every event it receives to `out`.
#[derive(Debug)]
pub struct TextView<W> {
    out: W,
    mode: ViewMode,
}

impl<W: Write> TextView<W> {
    /// Creates a view writing to `out`.
    pub fn new(out: W, mode: ViewMode) -> Self {
        Self { out, mode }
    }

    /// Consumes the view, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, event: &SessionEvent) -> std::io::Result<()> {
        match event {
            SessionEvent::TilesChanged(ops) => {
                for op in ops {
                    writeln!(self.out, "  {}", op)?;
                }
            }
            SessionEvent::BoardRestored(board) => {
                writeln!(self.out, "board restored:")?;
                writeln!(self.out, "{}", board)?;
            }
            SessionEvent::ScoreChanged(score) => writeln!(self.out, "score: {}", score)?,
            SessionEvent::UndoAvailabilityChanged(available) => {
                writeln!(self.out, "undo available: {}", available)?
            }
            SessionEvent::GameOver => writeln!(self.out, "game over")?,
        }
        Ok(())
    }

    fn write_json(&mut self, event: &SessionEvent) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(self.out, "{}", line)
    }
}

impl<W: Write> SessionObserver for TextView<W> {
    fn notify(&mut self, event: &SessionEvent) {
        let result = match self.mode {
            ViewMode::Text => self.write_text(event),
            ViewMode::Json => self.write_json(event),
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to write event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines() {
        let mut view = TextView::new(Vec::new(), ViewMode::Text);
        view.notify(&SessionEvent::ScoreChanged(8));
        view.notify(&SessionEvent::GameOver);

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "score: 8\ngame over\n");
    }

    #[test]
    fn test_json_lines() {
        let mut view = TextView::new(Vec::new(), ViewMode::Json);
        view.notify(&SessionEvent::UndoAvailabilityChanged(true));

        let out = String::from_utf8(view.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["event"], "undo_availability_changed");
        assert_eq!(value["data"], true);
    }
}
