//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything that moves. Commands that
//! arrive in the wrong phase are ignored rather than reported.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::particles::{Particle, ParticleField};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first jump/start
    Start,
    /// Active gameplay
    Running,
    /// Frozen, nothing advances
    Paused,
    /// Run ended on a collision
    Ended,
}

/// Discrete things that happened, for particle and driver hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Jumped,
    /// Actor got past an obstacle and earned its bonus
    ObstacleCleared { id: u32, bonus: u64 },
    LevelUp { level: u32 },
    Collided { obstacle_id: u32 },
}

/// The player-controlled runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner; x never changes during a run
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    pub airborne: bool,
}

impl Actor {
    /// Actor standing on the ground
    pub fn grounded(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.actor_width, tuning.actor_height);
        Self {
            pos: Vec2::new(tuning.actor_x, tuning.ground_y() - size.y),
            vel_y: 0.0,
            size,
            airborne: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Gravity step, clamped to the ground line
    pub fn apply_physics(&mut self, tuning: &Tuning) {
        self.vel_y += tuning.gravity;
        self.pos.y += self.vel_y;

        let rest_y = tuning.ground_y() - self.size.y;
        if self.pos.y >= rest_y {
            self.pos.y = rest_y;
            self.vel_y = 0.0;
            self.airborne = false;
        }
    }
}

/// A ground obstacle scrolling toward the actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Bonus already awarded
    pub scored: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Complete state of one runner session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session was created with
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub actor: Actor,
    /// Oldest first
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    /// Always >= 1
    pub level: u32,
    /// Ticks advanced in the current run
    pub time_ticks: u64,
    /// Milliseconds advanced in the current run
    pub elapsed_ms: f64,
    /// Gameplay RNG, only used for obstacle heights
    pub(crate) rng: Pcg32,
    pub(crate) particles: ParticleField,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// New session on the start screen, particles disabled
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_particles(seed, tuning, ParticleField::disabled())
    }

    /// New session with a particle field attached
    pub fn with_particles(seed: u64, tuning: Tuning, particles: ParticleField) -> Self {
        Self {
            seed,
            phase: GamePhase::Start,
            actor: Actor::grounded(&tuning),
            obstacles: Vec::new(),
            score: 0,
            level: 1,
            time_ticks: 0,
            elapsed_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            particles,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new obstacle ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset all run state, including undrained events. Phase is left to the caller.
    pub(crate) fn reset_run(&mut self) {
        self.actor = Actor::grounded(&self.tuning);
        self.obstacles.clear();
        self.particles.clear();
        self.events.clear();
        self.score = 0;
        self.level = 1;
        self.time_ticks = 0;
        self.elapsed_ms = 0.0;
    }

    /// Queue an event and let the particle field react to it
    pub(crate) fn emit(&mut self, event: GameEvent) {
        let actor = self.actor.rect();
        self.particles.observe(&event, &actor, &self.tuning);
        self.events.push(event);
    }

    pub fn actor_rect(&self) -> Rect {
        self.actor.rect()
    }

    pub fn obstacle_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.obstacles.iter().map(Obstacle::rect)
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// Current scroll speed
    pub fn speed(&self) -> f32 {
        self.tuning.speed_for_level(self.level)
    }

    /// Current spawn spacing
    pub fn spacing(&self) -> f32 {
        self.tuning.spacing_for_level(self.level)
    }

    /// Fraction of the way to the next level (HUD progress bar)
    pub fn level_progress(&self) -> f32 {
        let threshold = self.tuning.level_threshold.max(1);
        (self.score % threshold) as f32 / threshold as f32
    }

    /// Events since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take pending events; the driver calls this once per frame
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}
