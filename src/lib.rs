//! Dash Runner - A side-scrolling arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `scores`: Leaderboard client with retry and local fallback
//! - `persistence`: Key-value storage, best score
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod platform;
pub mod scores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::{BestScore, KeyValueStore, MemoryStore, StorageError};
pub use scores::{ClientConfig, ScoreClient};
pub use settings::Settings;
pub use sim::{GameEvent, GamePhase, GameState};
pub use tuning::Tuning;

/// Driver constants
pub mod consts {
    /// Longest frame the driver passes to `advance` (ms); a stalled tab
    /// shouldn't wipe all particles in one frame
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Frame time assumed for the very first frame (ms)
    pub const DEFAULT_FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Elapsed time between two animation-frame timestamps, clamped
#[inline]
pub fn frame_delta_ms(last: f64, now: f64) -> f32 {
    if last <= 0.0 || now < last {
        return consts::DEFAULT_FRAME_MS;
    }
    ((now - last) as f32).min(consts::MAX_FRAME_MS)
}
