use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::session::Match;

/// Persisted list of finished matches (JSON file on disk)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchHistory {
    matches: Vec<Match>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; a missing file is an empty history
    pub fn load(path: &Path) -> TrackerResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)
            .map_err(|e| TrackerError::Storage(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json)
            .map_err(|e| TrackerError::Storage(format!("parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> TrackerResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Storage(format!("serialize history: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| TrackerError::Storage(format!("write {}: {}", path.display(), e)))
    }

    pub fn push(&mut self, record: Match) {
        self.matches.push(record);
    }

    pub fn clear(&mut self) {
        self.matches.clear();
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
