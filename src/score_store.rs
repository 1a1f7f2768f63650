use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{error, warn};

use crate::error::StoreError;

/// Somewhere to keep high scores between sessions.
///
/// `read` never fails: a missing or unreadable value is reported as 0.
/// `write` is fire-and-forget; implementations log their own failures.
pub trait ScoreStore {
    fn read(&self, key: &str) -> u32;
    fn write(&mut self, key: &str, score: u32);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    scores: HashMap<String, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read(&self, key: &str) -> u32 {
        self.scores.get(key).copied().unwrap_or(0)
    }

    fn write(&mut self, key: &str, score: u32) {
        self.scores.insert(key.to_string(), score);
    }
}

/// Scores kept as a JSON object of `key -> score` in a single file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

type ScoreTable = BTreeMap<String, u32>;

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileScoreStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ScoreTable, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ScoreTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, table: &ScoreTable) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(table)?;
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for FileScoreStore {
    fn read(&self, key: &str) -> u32 {
        match self.load() {
            Ok(table) => table.get(key).copied().unwrap_or(0),
            Err(e) => {
                warn!("Error loading high score from {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn write(&mut self, key: &str, score: u32) {
        // A corrupt file is replaced rather than blocking the new record.
        let mut table = self.load().unwrap_or_default();
        table.insert(key.to_string(), score);
        if let Err(e) = self.store(&table) {
            error!("Error saving high score to {}: {}", self.path.display(), e);
        }
    }
}
