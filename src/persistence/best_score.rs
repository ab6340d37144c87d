//! Best score counter

use super::KeyValueStore;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "runner_best_score";

/// Highest score ever reached on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    /// Load from storage; missing, corrupt or unreadable values count as 0
    pub fn load(store: &impl KeyValueStore) -> Self {
        let score = match store.get(BEST_SCORE_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring corrupt best score {:?}", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Could not read best score: {}", e);
                0
            }
        };
        Self { score }
    }

    /// Record a finished run. Returns true on a new record.
    ///
    /// The in-memory value updates even if saving fails.
    pub fn record(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        if score <= self.score {
            return false;
        }
        self.score = score;
        if let Err(e) = store.set(BEST_SCORE_KEY, &score.to_string()) {
            log::warn!("Best score not saved: {}", e);
        }
        true
    }
}
