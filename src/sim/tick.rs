//! Per-frame simulation update and player commands
//!
//! The driver calls [`GameState::advance`] once per animation frame. Physics
//! and scrolling are per tick; only particle life uses the elapsed time.

use glam::Vec2;
use rand::Rng;

use super::collision::first_overlap;
use super::state::{GameEvent, GamePhase, GameState, Obstacle};

/// One-shot input collected between frames
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space, arrow up, click, tap). Starts the run on the title screen.
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart after game over
    pub restart: bool,
}

impl GameState {
    /// Begin a fresh run from any phase
    pub fn start(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Running;
        self.emit(GameEvent::Started);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Same as [`GameState::start`]
    pub fn restart(&mut self) {
        self.start();
    }

    /// Back to the title screen; the last run's numbers stay readable
    pub fn return_to_start(&mut self) {
        self.phase = GamePhase::Start;
    }

    /// Jump if grounded. On the title screen this starts the run instead.
    pub fn jump(&mut self) {
        match self.phase {
            GamePhase::Start => self.start(),
            GamePhase::Running if !self.actor.airborne => {
                self.actor.vel_y = self.tuning.jump_impulse;
                self.actor.airborne = true;
                self.emit(GameEvent::Jumped);
            }
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            log::debug!("Paused at tick {}", self.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            log::debug!("Resumed at tick {}", self.time_ticks);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Advance one tick. Does nothing unless the run is active.
    ///
    /// Events are appended, never cleared here: the driver should call
    /// [`GameState::drain_events`] every frame. A new run discards whatever
    /// was left undrained.
    pub fn advance(&mut self, dt_ms: f32) {
        if self.phase != GamePhase::Running {
            return;
        }

        self.time_ticks += 1;
        self.elapsed_ms += dt_ms as f64;

        self.actor.apply_physics(&self.tuning);
        self.advance_obstacles();
        self.spawn_if_due();
        self.particles.update(dt_ms, self.tuning.particle_gravity);
        self.accrue_score();
        self.update_level();
        self.check_collisions();
    }

    fn advance_obstacles(&mut self) {
        let speed = self.speed();
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= speed;
        }
        self.obstacles.retain(|o| o.right() >= 0.0);
    }

    fn spawn_if_due(&mut self) {
        let due = match self.obstacles.last() {
            None => true,
            Some(last) => self.tuning.world_width - last.pos.x >= self.spacing(),
        };
        if due {
            self.spawn_obstacle();
        }
    }

    /// Append an obstacle at the right edge with a seeded random height
    pub(crate) fn spawn_obstacle(&mut self) {
        let min_h = self.tuning.obstacle_min_height;
        let max_h = self.tuning.max_height_for_level(self.level);
        let height = if max_h > min_h {
            self.rng.random_range(min_h..max_h)
        } else {
            min_h
        };

        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(self.tuning.world_width, self.tuning.ground_y() - height),
            size: Vec2::new(self.tuning.obstacle_width, height),
            scored: false,
        });
    }

    fn accrue_score(&mut self) {
        self.score += self.tuning.score_per_tick;

        let actor_x = self.actor.pos.x;
        let bonus = self.tuning.clear_bonus;
        let mut cleared = Vec::new();
        for obstacle in &mut self.obstacles {
            if !obstacle.scored && obstacle.right() < actor_x {
                obstacle.scored = true;
                cleared.push(obstacle.id);
            }
        }

        for id in cleared {
            self.score += bonus;
            self.emit(GameEvent::ObstacleCleared { id, bonus });
        }
    }

    fn update_level(&mut self) {
        let level = self.tuning.level_for_score(self.score);
        if level > self.level {
            self.level = level;
            self.emit(GameEvent::LevelUp { level });
            log::info!("Level {} reached", level);
        }
    }

    fn check_collisions(&mut self) {
        let actor = self.actor.rect();
        let rects: Vec<_> = self.obstacle_rects().collect();
        if let Some(index) = first_overlap(&actor, rects.iter()) {
            let obstacle_id = self.obstacles[index].id;
            self.emit(GameEvent::Collided { obstacle_id });
            self.phase = GamePhase::Ended;
            log::info!("Game over - score {}, level {}", self.score, self.level);
        }
    }
}

/// Apply one frame of input, then advance
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if input.restart && state.phase == GamePhase::Ended {
        state.restart();
    }
    if input.pause {
        state.toggle_pause();
    }
    if input.jump {
        state.jump();
    }
    state.advance(dt_ms);
}
