//! Game settings and preferences
//!
//! Persisted as JSON through a [`KeyValueStore`] (LocalStorage on web).
//! Fields missing from an older save fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError, load_json, save_json};
use crate::scores::ClientConfig;
use crate::sim::MAX_PARTICLES;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Particle bursts on clears, level-ups and crashes
    pub particles: bool,

    /// Game balance
    pub tuning: Tuning,

    /// Leaderboard service
    pub client: ClientConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            tuning: Tuning::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "runner_settings";

    /// Particle cap (0 disables effects)
    pub fn max_particles(&self) -> usize {
        if self.particles { MAX_PARTICLES } else { 0 }
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_roundtrip() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.particles = false;
        settings.client.max_retries = 1;
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.max_particles(), 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"particles":false,"client":{"retry_delay_ms":250}}"#)
            .unwrap();

        let loaded = Settings::load(&store);
        assert!(!loaded.particles);
        assert_eq!(loaded.client.retry_delay_ms, 250);
        assert_eq!(loaded.client.max_retries, 3);
        assert_eq!(loaded.tuning, Tuning::default());
    }

    #[test]
    fn test_saves_with_retired_fields_still_load() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"sound":false,"master_volume":0.3,"particles":false}"#)
            .unwrap();

        let loaded = Settings::load(&store);
        assert!(!loaded.particles);
        assert_eq!(loaded.client, ClientConfig::default());
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
