//! Local score list
//!
//! Fallback leaderboard persisted through a [`KeyValueStore`]. Kept sorted by
//! score (best first) and trimmed to a fixed number of records, so the lowest
//! scores are the first to go.

use serde::{Deserialize, Serialize};

use super::record::{Origin, ScoreRecord, sort_by_score_desc};
use crate::persistence::{KeyValueStore, StorageError, load_json, save_json};

/// Storage key for the local list
pub const LOCAL_SCORES_KEY: &str = "runner_scores";

/// Default number of records kept on the device
pub const MAX_LOCAL_RECORDS: usize = 100;

/// Summary of the runs stored on this device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_games: usize,
    pub best_score: u64,
    pub best_level: u32,
    /// Rounded to the nearest point
    pub average_score: u64,
    /// First five of the score-sorted list
    pub top_games: Vec<ScoreRecord>,
}

/// Bounded, score-sorted record list
#[derive(Debug)]
pub struct LocalScores<K> {
    store: K,
    max_records: usize,
}

impl<K: KeyValueStore> LocalScores<K> {
    pub fn new(store: K, max_records: usize) -> Self {
        Self { store, max_records }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// All records, best first. A corrupt list reads as empty.
    pub fn load(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        let mut records = match load_json::<Vec<ScoreRecord>>(&self.store, LOCAL_SCORES_KEY) {
            Ok(records) => records.unwrap_or_default(),
            Err(StorageError::Json(e)) => {
                log::warn!("Local scores unreadable, starting fresh: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        sort_by_score_desc(&mut records);
        Ok(records)
    }

    /// Best `limit` records
    pub fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StorageError> {
        let mut records = self.load()?;
        records.truncate(limit);
        Ok(records)
    }

    /// Records never acknowledged by the service
    pub fn local_only(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        Ok(self.load()?.into_iter().filter(ScoreRecord::is_local).collect())
    }

    /// Append, re-sort, trim, save. Returns the 1-based rank, or None if the
    /// record fell straight off the end.
    pub fn insert(&mut self, record: ScoreRecord) -> Result<Option<usize>, StorageError> {
        let mut records = self.load()?;
        records.push(record.clone());
        sort_by_score_desc(&mut records);
        records.truncate(self.max_records);
        save_json(&mut self.store, LOCAL_SCORES_KEY, &records)?;

        let rank = records.iter().position(|r| *r == record).map(|i| i + 1);
        log::info!("Score saved locally ({} records)", records.len());
        Ok(rank)
    }

    /// Mark the given runs as acknowledged by the service
    pub fn promote(&mut self, synced: &[ScoreRecord]) -> Result<usize, StorageError> {
        if synced.is_empty() {
            return Ok(0);
        }
        let mut records = self.load()?;
        let mut promoted = 0;
        for record in records.iter_mut().filter(|r| r.is_local()) {
            if synced.iter().any(|s| s.same_run(record)) {
                record.origin = Origin::Remote;
                promoted += 1;
            }
        }
        if promoted > 0 {
            save_json(&mut self.store, LOCAL_SCORES_KEY, &records)?;
        }
        Ok(promoted)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(LOCAL_SCORES_KEY)?;
        log::info!("Local scores cleared");
        Ok(())
    }

    pub fn stats(&self) -> Result<PlayerStats, StorageError> {
        let records = self.load()?;
        if records.is_empty() {
            return Ok(PlayerStats::default());
        }

        let total: u64 = records.iter().map(|r| r.score).sum();
        let count = records.len() as u64;
        Ok(PlayerStats {
            total_games: records.len(),
            best_score: records.iter().map(|r| r.score).max().unwrap_or(0),
            best_level: records.iter().map(|r| r.level).max().unwrap_or(0),
            average_score: (total + count / 2) / count,
            top_games: records.iter().take(5).cloned().collect(),
        })
    }
}
