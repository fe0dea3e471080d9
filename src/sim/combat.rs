//! Combat resolution and the spawn director
//!
//! Each step reads entity positions and records what should happen; entity
//! removal is deferred to [`sweep`] so that no step sees a half-updated
//! collection.

use glam::Vec2;
use rand::Rng;

use super::collision::safe_spawn;
use super::entities::{Owner, Projectile};
use super::state::{EnemyKey, GameState, ProjectileKey};
use crate::consts::*;
use crate::dir_to_yaw;

/// Removals collected during one tick
#[derive(Debug, Default)]
pub struct Doomed {
    pub enemies: Vec<EnemyKey>,
    pub projectiles: Vec<ProjectileKey>,
}

impl Doomed {
    pub fn enemy(&mut self, handle: EnemyKey) {
        if !self.enemies.contains(&handle) {
            self.enemies.push(handle);
        }
    }

    pub fn projectile(&mut self, handle: ProjectileKey) {
        if !self.projectiles.contains(&handle) {
            self.projectiles.push(handle);
        }
    }

    pub fn has_projectile(&self, handle: ProjectileKey) -> bool {
        self.projectiles.contains(&handle)
    }
}

/// Try to place one enemy on a floor cell away from the player.
///
/// Returns `None` when every attempt landed too close.
pub fn try_spawn_enemy(state: &mut GameState) -> Option<EnemyKey> {
    for _ in 0..SPAWN_ATTEMPTS {
        let pos = safe_spawn(&state.grid, &mut state.rng);
        if pos.distance(state.player_marker) > SPAWN_MIN_PLAYER_DISTANCE {
            return Some(state.spawn_enemy(pos));
        }
    }
    None
}

/// Advance the spawn timer and spawn when it is due and the wave has room
pub fn update_spawning(state: &mut GameState, dt: f32) {
    state.spawn_timer += dt;
    if state.spawn_timer <= state.rules.spawn_interval || state.enemies.len() >= state.enemy_cap() {
        return;
    }

    if try_spawn_enemy(state).is_some() {
        state.spawn_timer = 0.0;
    } else {
        log::warn!("No spawn point clear of the player, retrying soon");
        state.spawn_timer = state.rules.spawn_interval * SPAWN_RETRY_FRACTION;
    }
}

/// Enemies touching the player hurt it on a fixed cadence
pub fn apply_contact_damage(state: &mut GameState, dt: f32) {
    state.contact_timer += dt;
    if state.contact_timer <= CONTACT_DAMAGE_INTERVAL {
        return;
    }

    let player = state.player.pos;
    let touching = state
        .enemies
        .iter()
        .filter(|(_, enemy)| enemy.pos.distance(player) < CONTACT_RADIUS)
        .count();

    for _ in 0..touching {
        let damage = state.rng.random_range(CONTACT_DAMAGE_MIN..CONTACT_DAMAGE_MAX);
        state.contact_timer = 0.0;
        if state.session.take_damage(damage) {
            break;
        }
    }
}

/// Enemies within range of the player occasionally shoot at it
pub fn enemy_fire(state: &mut GameState) {
    let player = state.player.pos;
    let chance = state.rules.enemy_fire_chance.clamp(0.0, 1.0);

    let mut shots: Vec<Projectile> = Vec::new();
    for (_, enemy) in state.enemies.iter() {
        if enemy.pos.distance(player) >= ENEMY_FIRE_RANGE {
            continue;
        }
        if !state.rng.random_bool(chance) {
            continue;
        }
        let dir = (player - enemy.pos).normalize_or_zero();
        let damage = state
            .rng
            .random_range(ENEMY_PROJECTILE_DAMAGE_MIN..ENEMY_PROJECTILE_DAMAGE_MAX);
        shots.push(Projectile::new(enemy.pos, dir_to_yaw(dir), damage, Owner::Enemy));
    }

    for shot in shots {
        state.spawn_projectile(shot);
    }
}

/// Player projectiles against enemies.
///
/// A projectile hits at most the first enemy in range. Damage is summed per
/// enemy and applied after every projectile has been checked; enemies at or
/// below zero health are marked and scored.
pub fn resolve_player_hits(state: &mut GameState, doomed: &mut Doomed) {
    let mut damage: Vec<(EnemyKey, f32)> = Vec::new();

    for (shot_handle, shot) in state.projectiles.iter() {
        if shot.owner != Owner::Player || doomed.has_projectile(shot_handle) {
            continue;
        }
        let target = state
            .enemies
            .iter()
            .find(|(_, enemy)| enemy.pos.distance(shot.pos) < ENEMY_HIT_RADIUS)
            .map(|(handle, _)| handle);

        if let Some(enemy_handle) = target {
            doomed.projectile(shot_handle);
            match damage.iter_mut().find(|(h, _)| *h == enemy_handle) {
                Some((_, total)) => *total += shot.damage,
                None => damage.push((enemy_handle, shot.damage)),
            }
        }
    }

    for (handle, amount) in damage {
        let Some(enemy) = state.enemies.get_mut(handle) else {
            continue;
        };
        enemy.health -= amount;
        if enemy.is_dead() {
            doomed.enemy(handle);
            log::debug!("Enemy {:?} destroyed", handle);
            state.session.record_kill(KILL_SCORE, state.rules.kills_per_wave);
        }
    }
}

/// Enemy projectiles against the player
pub fn resolve_enemy_hits(state: &mut GameState, doomed: &mut Doomed) {
    let player = state.player.pos;
    let hits: Vec<(ProjectileKey, f32)> = state
        .projectiles
        .iter()
        .filter(|(handle, shot)| {
            shot.owner == Owner::Enemy
                && !doomed.has_projectile(*handle)
                && shot.pos.distance(player) < PLAYER_HIT_RADIUS
        })
        .map(|(handle, shot)| (handle, shot.damage))
        .collect();

    for (handle, damage) in hits {
        doomed.projectile(handle);
        state.session.take_damage(damage);
    }
}

/// Apply every removal recorded this tick. Stale handles are ignored.
pub fn sweep(state: &mut GameState, doomed: Doomed) {
    for handle in doomed.projectiles {
        state.projectiles.remove(handle);
    }
    for handle in doomed.enemies {
        state.enemies.remove(handle);
    }
}

/// Nearest live enemy to a point
pub fn nearest_enemy(state: &GameState, point: Vec2) -> Option<(EnemyKey, Vec2)> {
    state
        .enemies
        .iter()
        .map(|(handle, enemy)| (handle, enemy.pos))
        .min_by(|a, b| {
            a.1.distance_squared(point)
                .partial_cmp(&b.1.distance_squared(point))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::{Grid, Tile};
    use crate::sim::session::GamePhase;
    use crate::sim::state::Rules;

    /// Playing state on an open walled field with the player at the origin
    fn arena_state() -> GameState {
        let mut state = GameState::new(Rules::default(), 2024);
        state.start();
        let mut grid = Grid::filled(30, 30, Tile::Floor);
        for i in 0..30 {
            grid.set(i, 0, Tile::Wall);
            grid.set(i, 29, Tile::Wall);
            grid.set(0, i, Tile::Wall);
            grid.set(29, i, Tile::Wall);
        }
        state.grid = grid;
        state.player.pos = Vec2::ZERO;
        state.publish_player_position();
        state
    }

    fn player_shot(pos: Vec2, damage: f32) -> Projectile {
        Projectile::new(pos, 0.0, damage, Owner::Player)
    }

    #[test]
    fn test_hits_accumulate_before_applying() {
        let mut state = arena_state();
        let enemy = state.spawn_enemy(Vec2::new(10.0, 10.0));
        let initial = state.enemies.get(enemy).unwrap().health;
        for d in [5.0, 7.0, 6.0] {
            state.spawn_projectile(player_shot(Vec2::new(10.5, 10.0), d));
        }

        let mut doomed = Doomed::default();
        resolve_player_hits(&mut state, &mut doomed);
        assert_eq!(doomed.projectiles.len(), 3);
        assert!(doomed.enemies.is_empty());
        assert!((state.enemies.get(enemy).unwrap().health - (initial - 18.0)).abs() < 0.0001);
        assert_eq!(state.session.score(), 0);
    }

    #[test]
    fn test_exact_lethal_sum_kills() {
        let mut state = arena_state();
        let enemy = state.spawn_enemy(Vec2::new(10.0, 10.0));
        let initial = state.enemies.get(enemy).unwrap().health;
        state.spawn_projectile(player_shot(Vec2::new(10.0, 11.0), initial - 5.0));
        state.spawn_projectile(player_shot(Vec2::new(9.0, 10.0), 5.0));

        let mut doomed = Doomed::default();
        resolve_player_hits(&mut state, &mut doomed);
        assert_eq!(doomed.enemies, vec![enemy]);
        assert_eq!(state.session.score(), KILL_SCORE);

        sweep(&mut state, doomed);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_hits_only_first_enemy() {
        let mut state = arena_state();
        let first = state.spawn_enemy(Vec2::new(10.0, 10.0));
        let second = state.spawn_enemy(Vec2::new(10.0, 11.0));
        state.spawn_projectile(player_shot(Vec2::new(10.0, 10.5), 1.0));

        let mut doomed = Doomed::default();
        resolve_player_hits(&mut state, &mut doomed);
        let first_enemy = state.enemies.get(first).unwrap();
        let second_enemy = state.enemies.get(second).unwrap();
        assert!(first_enemy.health < first_enemy.max_health);
        assert_eq!(second_enemy.health, second_enemy.max_health);
    }

    #[test]
    fn test_enemy_projectiles_ignore_enemies() {
        let mut state = arena_state();
        let enemy = state.spawn_enemy(Vec2::new(10.0, 10.0));
        state.spawn_projectile(Projectile::new(Vec2::new(10.0, 10.0), 0.0, 50.0, Owner::Enemy));

        let mut doomed = Doomed::default();
        resolve_player_hits(&mut state, &mut doomed);
        assert!(doomed.projectiles.is_empty());
        assert!(state.enemies.contains_key(enemy));
    }

    #[test]
    fn test_enemy_projectile_hurts_player() {
        let mut state = arena_state();
        state.spawn_projectile(Projectile::new(Vec2::new(0.5, 0.0), 0.0, 20.0, Owner::Enemy));
        state.spawn_projectile(Projectile::new(Vec2::new(5.0, 0.0), 0.0, 20.0, Owner::Enemy));

        let mut doomed = Doomed::default();
        resolve_enemy_hits(&mut state, &mut doomed);
        assert_eq!(doomed.projectiles.len(), 1);
        assert!((state.session.health() - 80.0).abs() < 0.0001);
    }

    #[test]
    fn test_lethal_projectile_ends_run() {
        let mut state = arena_state();
        state.session.health = 15.0;
        state.spawn_projectile(Projectile::new(Vec2::ZERO, 0.0, 20.0, Owner::Enemy));

        let mut doomed = Doomed::default();
        resolve_enemy_hits(&mut state, &mut doomed);
        assert_eq!(state.session.health(), 0.0);
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_spawn_blocked_at_cap() {
        let mut state = arena_state();
        assert_eq!(state.session.wave(), 1);
        for i in 0..5 {
            state.spawn_enemy(Vec2::new(-20.0 + i as f32, 20.0));
        }
        update_spawning(&mut state, 10.0);
        assert_eq!(state.enemies.len(), 5);
    }

    #[test]
    fn test_spawn_when_due_and_resets_timer() {
        let mut state = arena_state();
        state.spawn_timer = 0.0;
        update_spawning(&mut state, 1.0);
        assert!(state.enemies.is_empty());
        update_spawning(&mut state, 1.5);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_timer, 0.0);

        let (_, enemy) = state.enemies.iter().next().unwrap();
        assert!(enemy.pos.distance(state.player_marker) > SPAWN_MIN_PLAYER_DISTANCE);
    }

    #[test]
    fn test_spawn_backs_off_when_crowded() {
        let mut state = arena_state();
        // Tiny room: every floor cell is next to the player
        let mut grid = Grid::filled(5, 5, Tile::Wall);
        grid.set(2, 2, Tile::Floor);
        state.grid = grid;
        state.spawn_timer = 0.0;

        update_spawning(&mut state, 3.0);
        assert!(state.enemies.is_empty());
        let retry = state.rules.spawn_interval * SPAWN_RETRY_FRACTION;
        assert!((state.spawn_timer - retry).abs() < 0.0001);
    }

    #[test]
    fn test_contact_damage_on_cadence() {
        let mut state = arena_state();
        state.spawn_enemy(Vec2::new(1.0, 0.0));
        state.spawn_enemy(Vec2::new(15.0, 0.0));

        apply_contact_damage(&mut state, 0.3);
        assert_eq!(state.session.health(), PLAYER_MAX_HEALTH);

        apply_contact_damage(&mut state, 0.3);
        let lost = PLAYER_MAX_HEALTH - state.session.health();
        assert!((CONTACT_DAMAGE_MIN..CONTACT_DAMAGE_MAX).contains(&lost));
        assert_eq!(state.contact_timer, 0.0);
    }

    #[test]
    fn test_enemy_fire_aims_at_player() {
        let mut state = arena_state();
        state.rules.enemy_fire_chance = 1.0;
        state.spawn_enemy(Vec2::new(5.0, 0.0));
        state.spawn_enemy(Vec2::new(25.0, 0.0));

        enemy_fire(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        let (_, shot) = state.projectiles.iter().next().unwrap();
        assert_eq!(shot.owner, Owner::Enemy);
        assert!(shot.vel.x < 0.0);
        assert!((ENEMY_PROJECTILE_DAMAGE_MIN..ENEMY_PROJECTILE_DAMAGE_MAX).contains(&shot.damage));
    }

    #[test]
    fn test_sweep_skips_stale_handles() {
        let mut state = arena_state();
        let enemy = state.spawn_enemy(Vec2::new(5.0, 5.0));
        state.enemies.remove(enemy);
        let replacement = state.spawn_enemy(Vec2::new(6.0, 6.0));

        let mut doomed = Doomed::default();
        doomed.enemy(enemy);
        sweep(&mut state, doomed);
        assert!(state.enemies.contains_key(replacement));
    }
}
