//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a build can ship different
//! balance without touching `sim`. Units are world pixels and simulation ticks.

use serde::{Deserialize, Serialize};

/// Gameplay constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Visible world width; obstacles spawn at this x
    pub world_width: f32,
    /// Visible world height
    pub world_height: f32,
    /// Height of the ground strip at the bottom of the world
    pub ground_height: f32,

    /// Downward acceleration (units/tick²)
    pub gravity: f32,
    /// Upward velocity applied on jump (negative is up)
    pub jump_impulse: f32,
    /// Fixed horizontal position of the actor's left edge
    pub actor_x: f32,
    pub actor_width: f32,
    pub actor_height: f32,

    /// Scroll speed at level 1 (units/tick)
    pub base_speed: f32,
    /// Speed added every two levels
    pub speed_step: f32,

    pub obstacle_width: f32,
    pub obstacle_min_height: f32,
    /// Max obstacle height before the per-level bonus
    pub obstacle_max_height: f32,
    pub obstacle_height_per_level: f32,

    /// Gap between spawns at level 0
    pub base_spacing: f32,
    pub spacing_per_level: f32,
    /// Cap on the total per-level spacing reduction
    pub max_spacing_reduction: f32,
    /// Spacing never drops below this
    pub min_spacing: f32,

    /// Distance score added every tick
    pub score_per_tick: u64,
    /// Bonus for getting past an obstacle
    pub clear_bonus: u64,
    /// Points per level
    pub level_threshold: u64,

    /// Particles spawned per burst
    pub particle_burst: usize,
    pub particle_gravity: f32,
    /// Max initial particle speed on each axis
    pub particle_spread: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 400.0,
            ground_height: 50.0,

            gravity: 0.6,
            jump_impulse: -12.0,
            actor_x: 100.0,
            actor_width: 40.0,
            actor_height: 40.0,

            base_speed: 4.0,
            speed_step: 0.5,

            obstacle_width: 20.0,
            obstacle_min_height: 30.0,
            obstacle_max_height: 80.0,
            obstacle_height_per_level: 10.0,

            base_spacing: 300.0,
            spacing_per_level: 20.0,
            max_spacing_reduction: 150.0,
            min_spacing: 200.0,

            score_per_tick: 1,
            clear_bonus: 10,
            level_threshold: 500,

            particle_burst: 8,
            particle_gravity: 0.2,
            particle_spread: 4.0,
        }
    }
}

impl Tuning {
    /// y coordinate of the ground line
    pub fn ground_y(&self) -> f32 {
        self.world_height - self.ground_height
    }

    /// Scroll speed for a level: base + floor(level / 2) * step
    pub fn speed_for_level(&self, level: u32) -> f32 {
        self.base_speed + (level / 2) as f32 * self.speed_step
    }

    /// Required gap between consecutive spawns at a level
    pub fn spacing_for_level(&self, level: u32) -> f32 {
        let reduction = (level as f32 * self.spacing_per_level).min(self.max_spacing_reduction);
        (self.base_spacing - reduction).max(self.min_spacing)
    }

    /// Upper bound (exclusive) for obstacle heights at a level
    pub fn max_height_for_level(&self, level: u32) -> f32 {
        self.obstacle_max_height + level as f32 * self.obstacle_height_per_level
    }

    /// Level for a score: floor(score / threshold) + 1
    pub fn level_for_score(&self, score: u64) -> u32 {
        let threshold = self.level_threshold.max(1);
        (score / threshold + 1).min(u32::MAX as u64) as u32
    }

    /// Peak height of a full jump arc above the ground
    pub fn jump_apex(&self) -> f32 {
        self.jump_impulse * self.jump_impulse / (2.0 * self.gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_steps_every_two_levels() {
        let t = Tuning::default();
        assert_eq!(t.speed_for_level(1), 4.0);
        assert_eq!(t.speed_for_level(2), 4.5);
        assert_eq!(t.speed_for_level(3), 4.5);
        assert_eq!(t.speed_for_level(4), 5.0);
    }

    #[test]
    fn test_spacing_is_capped_and_floored() {
        let t = Tuning::default();
        assert_eq!(t.spacing_for_level(1), 280.0);
        assert_eq!(t.spacing_for_level(5), 200.0);
        // Reduction caps at 150, min spacing keeps it at 200
        assert_eq!(t.spacing_for_level(50), 200.0);

        let loose = Tuning {
            min_spacing: 100.0,
            ..Tuning::default()
        };
        assert_eq!(loose.spacing_for_level(50), 150.0);
    }

    #[test]
    fn test_level_for_score() {
        let t = Tuning::default();
        assert_eq!(t.level_for_score(0), 1);
        assert_eq!(t.level_for_score(499), 1);
        assert_eq!(t.level_for_score(500), 2);
        assert_eq!(t.level_for_score(1234), 3);
    }

    #[test]
    fn test_jump_clears_tallest_base_obstacle() {
        let t = Tuning::default();
        assert!(t.jump_apex() > t.max_height_for_level(1));
    }
}
