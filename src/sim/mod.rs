//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One `advance` per frame, driven from outside
//! - Seeded RNG only
//! - No rendering, network or platform dependencies

pub mod collision;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_overlap};
pub use particles::{MAX_PARTICLES, Particle, ParticleColor, ParticleField};
pub use state::{Actor, GameEvent, GamePhase, GameState, Obstacle};
pub use tick::{TickInput, tick};
