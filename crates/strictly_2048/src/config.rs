//! Session configuration loaded from TOML.

use super::spawner::FOUR_SPAWN_CHANCE;
use super::types::BOARD_SIZE;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Tunable rules for a play session.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether Undo may recover a session that reached game over.
    #[serde(default = "default_undo_after_game_over")]
    undo_after_game_over: bool,

    /// Probability that a spawned tile is a 4 instead of a 2.
    #[serde(default = "default_four_spawn_chance")]
    four_spawn_chance: f64,

    /// Number of tiles spawned on the empty opening board.
    #[serde(default = "default_initial_tiles")]
    initial_tiles: usize,

    /// Seed for the spawn random source; entropy when absent.
    #[serde(default)]
    seed: Option<u64>,
}

fn default_undo_after_game_over() -> bool {
    true
}

fn default_four_spawn_chance() -> f64 {
    FOUR_SPAWN_CHANCE
}

fn default_initial_tiles() -> usize {
    2
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            undo_after_game_over: default_undo_after_game_over(),
            four_spawn_chance: default_four_spawn_chance(),
            initial_tiles: default_initial_tiles(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading session config");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(?config, "Session config loaded");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is within range.
    ///
    /// The `with_*` builders do not validate; [`Session`](crate::Session)
    /// construction runs this check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.four_spawn_chance) {
            return Err(ConfigError::new(format!(
                "four_spawn_chance must be within [0, 1], got {}",
                self.four_spawn_chance
            )));
        }
        if self.initial_tiles == 0 || self.initial_tiles > BOARD_SIZE * BOARD_SIZE {
            return Err(ConfigError::new(format!(
                "initial_tiles must be within [1, {}], got {}",
                BOARD_SIZE * BOARD_SIZE,
                self.initial_tiles
            )));
        }
        Ok(())
    }

    /// Returns this config with a fixed spawn seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns this config with the given game-over undo policy.
    pub fn with_undo_after_game_over(mut self, allowed: bool) -> Self {
        self.undo_after_game_over = allowed;
        self
    }

    /// Returns this config with the given 4-tile probability.
    pub fn with_four_spawn_chance(mut self, chance: f64) -> Self {
        self.four_spawn_chance = chance;
        self
    }

    /// Returns this config with the given number of opening tiles.
    pub fn with_initial_tiles(mut self, count: usize) -> Self {
        self.initial_tiles = count;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new config error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SessionConfig::from_toml("").expect("Empty config is valid");
        assert_eq!(config, SessionConfig::default());
        assert!(*config.undo_after_game_over());
        assert_eq!(*config.initial_tiles(), 2);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SessionConfig::from_toml("undo_after_game_over = false\nseed = 9\n")
            .expect("Valid config");
        assert!(!*config.undo_after_game_over());
        assert_eq!(*config.seed(), Some(9));
        assert_eq!(*config.four_spawn_chance(), FOUR_SPAWN_CHANCE);
    }

    #[test]
    fn test_rejects_out_of_range_chance() {
        let err = SessionConfig::from_toml("four_spawn_chance = 1.5").unwrap_err();
        assert!(err.message.contains("four_spawn_chance"));
    }

    #[test]
    fn test_rejects_too_many_initial_tiles() {
        assert!(SessionConfig::from_toml("initial_tiles = 17").is_err());
    }

    #[test]
    fn test_rejects_zero_initial_tiles() {
        let err = SessionConfig::from_toml("initial_tiles = 0").unwrap_err();
        assert!(err.message.contains("initial_tiles"));
    }

    #[test]
    fn test_builders_are_checked_by_validate() {
        assert!(SessionConfig::default().validate().is_ok());
        assert!(SessionConfig::default().with_four_spawn_chance(1.5).validate().is_err());
        assert!(SessionConfig::default().with_four_spawn_chance(f64::NAN).validate().is_err());
        assert!(SessionConfig::default().with_initial_tiles(40).validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "four_spawn_chance = 0.25").expect("Failed to write config");

        let config = SessionConfig::from_file(file.path()).expect("Valid config file");
        assert_eq!(*config.four_spawn_chance(), 0.25);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = SessionConfig::from_file("/nonexistent/strictly_2048.toml").unwrap_err();
        assert!(err.message.contains("read"));
    }
}
