//! Maze Arena - simulation core for a top-down tile-maze arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map, collisions, entities, combat, game state)
//! - `settings`: Data-driven run configuration and difficulty presets
//!
//! World positions live on the horizontal plane. They are stored as `Vec2`
//! where `.x` is world x and `.y` is world z; height only matters for aiming.

pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz, the rate the per-tick constants are tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta the driver will accept before clamping
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Map defaults
    pub const TILE_SIZE: f32 = 2.0;
    pub const MAP_ROWS: usize = 30;
    pub const MAP_COLS: usize = 30;
    /// Largest map edge a grid will allocate
    pub const MAX_MAP_SIZE: usize = 512;
    /// Random walk length as a fraction of the cell count
    pub const WALK_COVERAGE: f64 = 0.6;
    /// Chance per walk step to carve the four neighbours as well
    pub const WIDEN_CHANCE: f64 = 0.3;
    /// Samples tried before a safe spawn falls back to the origin
    pub const SAFE_SPAWN_ATTEMPTS: u32 = 100;

    /// Player
    pub const PLAYER_RADIUS: f32 = 0.8;
    pub const PLAYER_ACCEL: f32 = 0.04;
    pub const PLAYER_DAMPING: f32 = 0.85;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    /// Gun position relative to the player (x, height, forward)
    pub const MUZZLE_OFFSET: Vec3 = Vec3::new(0.0, 1.2, 0.6);

    /// Aiming: horizontal plane the pointer ray is intersected with
    pub const AIM_PLANE_HEIGHT: f32 = 1.2;
    /// Top-down camera looking at the origin
    pub const CAMERA_HEIGHT: f32 = 60.0;
    pub const CAMERA_FOV_Y_DEGREES: f32 = 75.0;
    pub const CAMERA_ASPECT: f32 = 16.0 / 9.0;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 0.9;
    pub const ENEMY_MAX_SPEED: f32 = 0.1;
    pub const ENEMY_TURN_RATE: f32 = 0.1;
    pub const ENEMY_BASE_HEALTH: f32 = 15.0;
    pub const ENEMY_HEALTH_PER_WAVE: f32 = 10.0;

    /// Projectiles (distance per tick)
    pub const PROJECTILE_SPEED: f32 = 1.0;
    /// Projectiles farther than this from the world origin are culled
    pub const PROJECTILE_MAX_RANGE: f32 = 100.0;
    pub const PLAYER_PROJECTILE_COLOR: u32 = 0xfbbf24;
    pub const ENEMY_PROJECTILE_COLOR: u32 = 0xff6600;

    /// Spawn director
    pub const SPAWN_INTERVAL: f32 = 2.0;
    /// Timer value after a failed spawn, as a fraction of the interval
    pub const SPAWN_RETRY_FRACTION: f32 = 0.9;
    pub const SPAWN_ATTEMPTS: u32 = 10;
    pub const SPAWN_MIN_PLAYER_DISTANCE: f32 = 10.0;
    pub const ENEMIES_PER_WAVE: usize = 5;
    pub const KILLS_PER_WAVE: u32 = 5;

    /// Combat
    pub const CONTACT_DAMAGE_INTERVAL: f32 = 0.5;
    pub const CONTACT_RADIUS: f32 = 2.0;
    pub const CONTACT_DAMAGE_MIN: f32 = 10.0;
    pub const CONTACT_DAMAGE_MAX: f32 = 20.0;
    pub const ENEMY_FIRE_RANGE: f32 = 15.0;
    /// Chance per tick that an enemy in range fires
    pub const ENEMY_FIRE_CHANCE: f64 = 0.003;
    /// Enemy projectile vs player
    pub const PLAYER_HIT_RADIUS: f32 = 1.2;
    /// Player projectile vs enemy
    pub const ENEMY_HIT_RADIUS: f32 = 2.5;
    pub const ENEMY_PROJECTILE_DAMAGE_MIN: f32 = 15.0;
    pub const ENEMY_PROJECTILE_DAMAGE_MAX: f32 = 30.0;
    pub const KILL_SCORE: u64 = 100;
}

/// Unit forward direction on the ground plane for a yaw angle.
///
/// Yaw 0 faces +z, positive yaw turns toward +x.
#[inline]
pub fn yaw_to_dir(yaw: f32) -> Vec2 {
    Vec2::new(yaw.sin(), yaw.cos())
}

/// Yaw angle that faces along `dir` (inverse of [`yaw_to_dir`])
#[inline]
pub fn dir_to_yaw(dir: Vec2) -> f32 {
    dir.x.atan2(dir.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_yaw_roundtrip() {
        let dir = yaw_to_dir(FRAC_PI_2);
        assert!((dir.x - 1.0).abs() < 0.0001);
        assert!(dir.y.abs() < 0.0001);
        assert!((dir_to_yaw(dir) - FRAC_PI_2).abs() < 0.0001);
    }
}
