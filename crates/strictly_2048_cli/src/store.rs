//! Key-value persistence port for high scores.

use derive_more::{Display, Error};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Key-value store the HUD reads and writes persisted numbers through.
pub trait ScoreStore {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError>;

    /// Writes `value` under `key`.
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
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

/// In-memory store, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a flat TOML table on disk.
///
/// A missing file reads as empty and is created on first write.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    /// Creates a store for the file at `path`.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<toml::Table, StoreError> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StoreError::new(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;
        content.parse::<toml::Table>().map_err(|e| {
            StoreError::new(format!("Failed to parse '{}': {}", self.path.display(), e))
        })
    }
}

impl ScoreStore for TomlFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        let table = self.load()?;
        match table.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_integer()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| StoreError::new(format!("Value for '{}' is not a score", key))),
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        let mut table = self.load()?;
        table.insert(key.to_string(), toml::Value::Integer(i64::from(value)));
        let content = toml::to_string(&table)
            .map_err(|e| StoreError::new(format!("Failed to encode scores: {}", e)))?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::new(format!("Failed to write '{}': {}", self.path.display(), e))
        })?;
        debug!(key, value, "Stored value");
        Ok(())
    }
}
