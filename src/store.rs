//! Key-value persistence port
//!
//! The core only needs two operations: read the best score at startup and
//! write it whenever it is exceeded. The trait keeps the sim ignorant of
//! where values live; the file-backed store degrades to empty on any read
//! problem and saves best-effort.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted best-score key.
pub const BEST_SCORE_KEY: &str = "BEST_SCORE";

/// Named-value persistence consumed by the run state machine.
pub trait KvStore {
    fn get_i64(&self, key: &str) -> Option<i64>;
    fn set_i64(&mut self, key: &str, value: i64);
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemStore {
    map: HashMap<String, i64>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemStore {
    fn get_i64(&self, key: &str) -> Option<i64> {
        self.map.get(key).copied()
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        self.map.insert(key.to_string(), value);
    }
}

/// Flat JSON file of string -> integer, written through on every set.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    map: HashMap<String, i64>,
}

impl JsonFileStore {
    /// Open (or start empty). A missing or corrupt file is not an error;
    /// it just means no saved values yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HashMap<String, i64>>(&json) {
                Ok(map) => {
                    log::info!("Loaded {} saved values from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    log::warn!("Corrupt save file {}: {e}; starting fresh", path.display());
                    HashMap::new()
                }
            },
            Err(_) => {
                log::info!("No save file at {}; starting fresh", path.display());
                HashMap::new()
            }
        };
        Self { path, map }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        match serde_json::to_string_pretty(&self.map) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    log::warn!("Failed to write save file {}: {e}", self.path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize save data: {e}"),
        }
    }
}

impl KvStore for JsonFileStore {
    fn get_i64(&self, key: &str) -> Option<i64> {
        self.map.get(key).copied()
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        self.map.insert(key.to_string(), value);
        self.flush();
    }
}
