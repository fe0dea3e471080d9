//! Player, enemy and projectile kinematics
//!
//! All per-tick constants are distances per tick at the fixed simulation
//! rate; timers elsewhere work in seconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{is_solid, resolve_collision};
use super::map::Grid;
use crate::consts::*;
use crate::{dir_to_yaw, yaw_to_dir};

/// Held movement directions for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    /// Acceleration direction (unnormalized, screen-up is -z)
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis
    }
}

/// Weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Pistol,
    Shotgun,
    Rifle,
}

impl Weapon {
    pub const ALL: [Weapon; 3] = [Weapon::Pistol, Weapon::Shotgun, Weapon::Rifle];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weapon::Pistol => "Pistol",
            Weapon::Shotgun => "Shotgun",
            Weapon::Rifle => "Rifle",
        }
    }

    /// Ticks between shots
    pub fn cooldown_ticks(&self) -> u32 {
        match self {
            Weapon::Pistol => 15,
            Weapon::Shotgun => 40,
            Weapon::Rifle => 6,
        }
    }

    /// Damage per projectile
    pub fn damage(&self) -> f32 {
        match self {
            Weapon::Pistol => 25.0,
            Weapon::Shotgun => 15.0,
            Weapon::Rifle => 15.0,
        }
    }

    /// Projectiles per shot and their total angular spread (radians)
    pub fn pattern(&self) -> (u32, f32) {
        match self {
            Weapon::Shotgun => (5, 0.4),
            _ => (1, 0.0),
        }
    }

    /// Ammo a fresh run starts with
    pub fn starting_ammo(&self) -> Ammo {
        match self {
            Weapon::Pistol => Ammo::Infinite,
            Weapon::Shotgun => Ammo::Rounds(24),
            Weapon::Rifle => Ammo::Rounds(90),
        }
    }

    fn slot(&self) -> usize {
        match self {
            Weapon::Pistol => 0,
            Weapon::Shotgun => 1,
            Weapon::Rifle => 2,
        }
    }
}

/// Remaining ammunition for a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ammo {
    Infinite,
    Rounds(u32),
}

impl Ammo {
    pub fn is_empty(&self) -> bool {
        *self == Ammo::Rounds(0)
    }

    /// Use one round. Returns false (and changes nothing) when empty.
    pub fn consume(&mut self) -> bool {
        match self {
            Ammo::Infinite => true,
            Ammo::Rounds(0) => false,
            Ammo::Rounds(n) => {
                *n -= 1;
                true
            }
        }
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Facing angle (for rendering)
    pub yaw: f32,
    /// Fixed at spawn, never re-aimed
    pub vel: Vec2,
    pub damage: f32,
    pub owner: Owner,
    pub color: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, yaw: f32, damage: f32, owner: Owner) -> Self {
        let color = match owner {
            Owner::Player => PLAYER_PROJECTILE_COLOR,
            Owner::Enemy => ENEMY_PROJECTILE_COLOR,
        };
        Self {
            pos,
            yaw,
            vel: yaw_to_dir(yaw) * PROJECTILE_SPEED,
            damage,
            owner,
            color,
        }
    }

    /// Advance one tick. Returns true when the projectile should be removed
    /// (it entered a wall or left the arena).
    pub fn update(&mut self, grid: &Grid) -> bool {
        self.pos += self.vel;
        is_solid(grid, self.pos) || self.pos.length() > PROJECTILE_MAX_RANGE
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: f32,
    pub max_health: f32,
}

impl Enemy {
    /// Spawn with health scaled to the wave
    pub fn new(pos: Vec2, wave: u32) -> Self {
        let health = ENEMY_BASE_HEALTH + wave as f32 * ENEMY_HEALTH_PER_WAVE;
        Self {
            pos,
            vel: Vec2::ZERO,
            health,
            max_health: health,
        }
    }

    /// Seek toward `target` with a limited turn rate, then slide along walls
    pub fn update(&mut self, target: Vec2, grid: &Grid) {
        let desired = (target - self.pos).normalize_or_zero() * ENEMY_MAX_SPEED;
        let steer = (desired - self.vel) * ENEMY_TURN_RATE;
        self.vel = (self.vel + steer).clamp_length_max(ENEMY_MAX_SPEED);
        self.pos += self.vel;
        resolve_collision(grid, &mut self.pos, ENEMY_RADIUS);
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// The player's unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle, independent of movement
    pub yaw: f32,
    /// Ticks until the next shot is allowed
    pub cooldown: u32,
    pub weapon: Weapon,
    ammo: [Ammo; 3],
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            yaw: 0.0,
            cooldown: 0,
            weapon: Weapon::Pistol,
            ammo: Weapon::ALL.map(|w| w.starting_ammo()),
        }
    }

    pub fn ammo(&self, weapon: Weapon) -> Ammo {
        self.ammo[weapon.slot()]
    }

    pub fn set_ammo(&mut self, weapon: Weapon, ammo: Ammo) {
        self.ammo[weapon.slot()] = ammo;
    }

    /// Accelerate from input, damp, integrate and slide along walls
    pub fn update_movement(&mut self, input: &MoveInput, grid: &Grid) {
        self.vel += input.axis() * PLAYER_ACCEL;
        self.vel *= PLAYER_DAMPING;
        self.pos += self.vel;
        resolve_collision(grid, &mut self.pos, PLAYER_RADIUS);
    }

    /// Face a ground-plane point. Leaves the yaw alone when the point is
    /// directly underneath.
    pub fn face(&mut self, point: Vec2) {
        let dir = point - self.pos;
        if dir.length_squared() > f32::EPSILON {
            self.yaw = dir_to_yaw(dir);
        }
    }

    /// Muzzle position on the ground plane for the current transform
    pub fn muzzle(&self) -> Vec2 {
        let forward = yaw_to_dir(self.yaw);
        let right = Vec2::new(forward.y, -forward.x);
        self.pos + forward * MUZZLE_OFFSET.z + right * MUZZLE_OFFSET.x
    }

    /// Tick the weapon. With `trigger` held and the weapon ready, consumes a
    /// round and returns the projectiles fired; otherwise returns nothing.
    pub fn update_weapon(&mut self, trigger: bool) -> Vec<Projectile> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
        if !trigger || self.cooldown > 0 {
            return Vec::new();
        }

        let weapon = self.weapon;
        if !self.ammo[weapon.slot()].consume() {
            return Vec::new();
        }
        self.cooldown = weapon.cooldown_ticks();

        let muzzle = self.muzzle();
        let (count, spread) = weapon.pattern();
        (0..count)
            .map(|i| {
                let offset = if count > 1 {
                    -spread / 2.0 + spread * i as f32 / (count - 1) as f32
                } else {
                    0.0
                };
                Projectile::new(muzzle, self.yaw + offset, weapon.damage(), Owner::Player)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{grid_to_world, tile_bounds};
    use crate::sim::map::Tile;

    /// 5x5 grid: 3x3 floor room inside a wall ring
    fn room() -> Grid {
        let mut grid = Grid::filled(5, 5, Tile::Wall);
        for row in 1..4 {
            for col in 1..4 {
                grid.set(col, row, Tile::Floor);
            }
        }
        grid
    }

    fn open_field() -> Grid {
        let mut grid = Grid::filled(40, 40, Tile::Floor);
        for i in 0..40 {
            grid.set(i, 0, Tile::Wall);
            grid.set(i, 39, Tile::Wall);
            grid.set(0, i, Tile::Wall);
            grid.set(39, i, Tile::Wall);
        }
        grid
    }

    #[test]
    fn test_player_stops_at_wall() {
        let grid = room();
        let mut player = Player::new(grid_to_world(&grid, 2, 2));
        let right = MoveInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            player.update_movement(&right, &grid);
        }

        // Room interior spans [-3, 3]; the wall column starts at x = 3
        let (min, max) = tile_bounds(&grid, 4, 2);
        let gap = (player.pos - player.pos.clamp(min, max)).length();
        assert!(gap >= PLAYER_RADIUS - 0.0001);
        assert!(player.pos.x <= 3.0 - PLAYER_RADIUS + 0.0001);
        assert!(player.pos.x > 2.0);
    }

    #[test]
    fn test_player_drifts_to_stop() {
        let grid = open_field();
        let mut player = Player::new(Vec2::ZERO);
        player.vel = Vec2::new(0.3, 0.0);
        for _ in 0..100 {
            player.update_movement(&MoveInput::default(), &grid);
        }
        assert!(player.vel.length() < 0.0001);
        assert!(player.pos.x > 1.0);
    }

    #[test]
    fn test_face_point() {
        let mut player = Player::new(Vec2::ZERO);
        player.face(Vec2::new(5.0, 0.0));
        assert!((player.yaw - std::f32::consts::FRAC_PI_2).abs() < 0.0001);
        let muzzle = player.muzzle();
        assert!((muzzle - Vec2::new(0.6, 0.0)).length() < 0.0001);

        // Pointing straight down at the player keeps the old heading
        player.face(Vec2::ZERO);
        assert!((player.yaw - std::f32::consts::FRAC_PI_2).abs() < 0.0001);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut player = Player::new(Vec2::ZERO);
        assert_eq!(player.update_weapon(true).len(), 1);
        assert_eq!(player.cooldown, Weapon::Pistol.cooldown_ticks());
        // Cooldown counts down once per tick before the next shot
        for _ in 0..Weapon::Pistol.cooldown_ticks() - 1 {
            assert!(player.update_weapon(true).is_empty());
        }
        assert_eq!(player.update_weapon(true).len(), 1);
        assert_eq!(player.ammo(Weapon::Pistol), Ammo::Infinite);
    }

    #[test]
    fn test_empty_weapon_does_not_fire() {
        let mut player = Player::new(Vec2::ZERO);
        player.weapon = Weapon::Rifle;
        player.set_ammo(Weapon::Rifle, Ammo::Rounds(0));
        assert!(player.update_weapon(true).is_empty());
        assert_eq!(player.ammo(Weapon::Rifle), Ammo::Rounds(0));
        assert_eq!(player.cooldown, 0);
    }

    #[test]
    fn test_shotgun_spread_uses_one_round() {
        let mut player = Player::new(Vec2::ZERO);
        player.weapon = Weapon::Shotgun;
        let shots = player.update_weapon(true);
        assert_eq!(shots.len(), 5);
        assert_eq!(player.ammo(Weapon::Shotgun), Ammo::Rounds(23));
        let (min, max) = shots.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| {
            (lo.min(p.yaw), hi.max(p.yaw))
        });
        assert!((max - min - 0.4).abs() < 0.0001);
        assert!(shots.iter().all(|p| p.owner == Owner::Player));
    }

    #[test]
    fn test_enemy_seeks_with_capped_speed() {
        let grid = open_field();
        let mut enemy = Enemy::new(Vec2::new(-10.0, 0.0), 1);
        let start = enemy.pos;
        enemy.update(Vec2::new(10.0, 0.0), &grid);
        // Turn rate limits the first step to a tenth of max speed
        assert!((enemy.vel.x - ENEMY_MAX_SPEED * ENEMY_TURN_RATE).abs() < 0.0001);
        for _ in 0..200 {
            enemy.update(Vec2::new(10.0, 0.0), &grid);
            assert!(enemy.vel.length() <= ENEMY_MAX_SPEED + 0.0001);
        }
        assert!(enemy.pos.x > start.x + 10.0);
    }

    #[test]
    fn test_enemy_health_scales_with_wave() {
        let wave1 = Enemy::new(Vec2::ZERO, 1);
        let wave4 = Enemy::new(Vec2::ZERO, 4);
        assert_eq!(wave1.health, ENEMY_BASE_HEALTH + ENEMY_HEALTH_PER_WAVE);
        assert_eq!(wave4.health, ENEMY_BASE_HEALTH + 4.0 * ENEMY_HEALTH_PER_WAVE);
    }

    #[test]
    fn test_projectile_flies_straight_until_wall() {
        let grid = room();
        let mut shot = Projectile::new(Vec2::ZERO, std::f32::consts::FRAC_PI_2, 10.0, Owner::Player);
        assert!(!shot.update(&grid));
        assert!((shot.pos - Vec2::new(1.0, 0.0)).length() < 0.0001);
        assert!(!shot.update(&grid));
        // x = 3 is the first wall column
        assert!(shot.update(&grid));
    }

    #[test]
    fn test_projectile_range_limit() {
        let grid = Grid::filled(200, 200, Tile::Floor);
        let mut shot = Projectile::new(Vec2::new(99.5, 0.0), std::f32::consts::FRAC_PI_2, 10.0, Owner::Enemy);
        assert!(shot.update(&grid));
        assert_eq!(shot.color, ENEMY_PROJECTILE_COLOR);
    }
}
