//! Simulation tick
//!
//! Core game loop step: lifecycle input, player, enemies, projectiles, then
//! the combat director and the end-of-tick sweep.

use glam::Vec2;

use super::collision::safe_spawn;
use super::combat::{self, Doomed};
use super::entities::{MoveInput, Weapon};
use super::state::GameState;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement directions
    pub movement: MoveInput,
    /// Pointer in normalized device coordinates, for aiming
    pub pointer: Option<Vec2>,
    /// Fire button held
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a run from the menu
    pub start: bool,
    /// Restart after game over (or from the pause menu)
    pub restart: bool,
    /// Back to the menu
    pub menu: bool,
    /// Switch weapon
    pub select_weapon: Option<Weapon>,
    /// Force an enemy spawn (debug/testing)
    pub debug_spawn: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

impl TickInput {
    /// True if any one-shot field is set
    pub fn has_one_shots(&self) -> bool {
        self.pause
            || self.start
            || self.restart
            || self.menu
            || self.debug_spawn
            || self.select_weapon.is_some()
    }

    /// Clear one-shot inputs after they have been processed
    pub fn clear_one_shots(&mut self) {
        self.pause = false;
        self.start = false;
        self.restart = false;
        self.menu = false;
        self.debug_spawn = false;
        self.select_weapon = None;
    }
}

/// Advance the game state by one tick of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.menu {
        state.to_menu();
    }
    if input.start {
        state.start();
    }
    if input.restart {
        state.restart();
    }
    if input.pause {
        state.toggle_pause();
    }

    // Only Playing advances the world
    if !state.session.is_playing() {
        return;
    }

    state.time_ticks += 1;

    let mut input = input.clone();
    let mut aim_target = None;
    if input.autopilot {
        aim_target = autopilot(state, &mut input);
    }
    let input = &input;

    if let Some(weapon) = input.select_weapon {
        state.player.weapon = weapon;
    }

    // Player
    state.player.update_movement(&input.movement, &state.grid);
    state.publish_player_position();

    let aim_target = aim_target.or_else(|| {
        input
            .pointer
            .and_then(|ndc| state.camera.aim_point(ndc, AIM_PLANE_HEIGHT))
    });
    if let Some(target) = aim_target {
        state.player.face(target);
    }

    for shot in state.player.update_weapon(input.fire) {
        state.spawn_projectile(shot);
    }

    // Enemies chase the published player position
    let target = state.player_marker;
    for (_, enemy) in state.enemies.iter_mut() {
        enemy.update(target, &state.grid);
    }

    // Projectiles
    let mut doomed = Doomed::default();
    for (handle, shot) in state.projectiles.iter_mut() {
        if shot.update(&state.grid) {
            doomed.projectile(handle);
        }
    }

    if input.debug_spawn {
        let pos = safe_spawn(&state.grid, &mut state.rng);
        state.spawn_enemy(pos);
    }

    // Director
    combat::update_spawning(state, dt);
    combat::apply_contact_damage(state, dt);
    // A run that ended this tick stops mutating; only pending removals apply
    if state.session.is_playing() {
        combat::enemy_fire(state);
        combat::resolve_player_hits(state, &mut doomed);
        combat::resolve_enemy_hits(state, &mut doomed);
    }

    combat::sweep(state, doomed);
}

/// Demo-mode pilot: back away from close enemies, close in on far ones,
/// shoot at the nearest. Rewrites `input` and returns the aim point.
fn autopilot(state: &GameState, input: &mut TickInput) -> Option<Vec2> {
    let player = state.player.pos;
    let (_, enemy_pos) = combat::nearest_enemy(state, player)?;

    let to_enemy = enemy_pos - player;
    let dist = to_enemy.length();
    let heading = if dist < 6.0 {
        -to_enemy
    } else if dist > 12.0 {
        to_enemy
    } else {
        Vec2::ZERO
    };
    let heading = heading.normalize_or_zero();
    input.movement = MoveInput {
        up: heading.y < -0.3,
        down: heading.y > 0.3,
        left: heading.x < -0.3,
        right: heading.x > 0.3,
    };

    // Shotgun up close while it has shells, pistol otherwise
    let weapon = if dist < 5.0 && !state.player.ammo(Weapon::Shotgun).is_empty() {
        Weapon::Shotgun
    } else {
        Weapon::Pistol
    };
    if weapon != state.player.weapon {
        input.select_weapon = Some(weapon);
    }

    input.fire = dist < ENEMY_FIRE_RANGE + 5.0;
    Some(enemy_pos)
}
