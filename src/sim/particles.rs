//! Cosmetic particle bursts
//!
//! Particles never influence gameplay. The field listens to [`GameEvent`]s and
//! uses its own RNG stream, so a headless build (capacity 0) plays out exactly
//! like one with effects on.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::GameEvent;
use crate::tuning::Tuning;

/// RNG stream reserved for particles
const PARTICLE_STREAM: u64 = 0xB0A7;

/// Max particles alive at once when effects are enabled
pub const MAX_PARTICLES: usize = 256;

/// Burst colors, one per event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Cleared,
    LevelUp,
    Crash,
}

impl ParticleColor {
    /// CSS color for the canvas
    pub fn css(&self) -> &'static str {
        match self {
            ParticleColor::Cleared => "#51CF66",
            ParticleColor::LevelUp => "#FFD43B",
            ParticleColor::Crash => "#FCE732",
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    /// 0-1, decreases with elapsed time
    pub life: f32,
}

/// Owns all live particles
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    capacity: usize,
    rng: Pcg32,
}

impl ParticleField {
    pub fn new(seed: u64, capacity: usize) -> Self {
        Self {
            particles: Vec::new(),
            capacity,
            rng: Pcg32::new(seed, PARTICLE_STREAM),
        }
    }

    /// A field that never spawns anything
    pub fn disabled() -> Self {
        Self {
            particles: Vec::new(),
            capacity: 0,
            rng: Pcg32::seed_from_u64(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// React to an engine event with a burst around the actor
    pub fn observe(&mut self, event: &GameEvent, actor: &Rect, tuning: &Tuning) {
        let (origin, color) = match event {
            GameEvent::ObstacleCleared { .. } => (actor.center(), ParticleColor::Cleared),
            GameEvent::LevelUp { .. } => (actor.center() - Vec2::new(0.0, 20.0), ParticleColor::LevelUp),
            GameEvent::Collided { .. } => (actor.center(), ParticleColor::Crash),
            _ => return,
        };
        self.burst(origin, color, tuning);
    }

    fn burst(&mut self, origin: Vec2, color: ParticleColor, tuning: &Tuning) {
        let spread = tuning.particle_spread;
        for _ in 0..tuning.particle_burst {
            if self.particles.len() >= self.capacity {
                break;
            }
            let vel = Vec2::new(
                self.rng.random_range(-spread..spread),
                self.rng.random_range(-spread..spread),
            );
            self.particles.push(Particle {
                pos: origin,
                vel,
                color,
                life: 1.0,
            });
        }
    }

    /// Integrate one tick; `dt_ms` drives the life decay
    pub fn update(&mut self, dt_ms: f32, gravity: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.vel.y += gravity;
            p.life -= dt_ms * 0.001;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
