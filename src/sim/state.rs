//! Game state and run lifecycle
//!
//! Everything a tick reads or writes lives here: the map, the session, the
//! entity slot maps, the director timers and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use slotmap::{SlotMap, new_key_type};

use super::aim::Camera;
use super::collision::safe_spawn;
use super::entities::{Enemy, Player, Projectile};
use super::map::{self, Grid};
use super::session::{GamePhase, Session};
use crate::Settings;
use crate::consts::*;

new_key_type! {
    /// Live enemy; stale once the enemy is removed
    pub struct EnemyKey;
    pub struct ProjectileKey;
}

/// Gameplay knobs resolved from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub map_rows: usize,
    pub map_cols: usize,
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    /// Live enemy cap per wave number
    pub enemies_per_wave: usize,
    /// Chance per tick that an enemy in range fires
    pub enemy_fire_chance: f64,
    pub kills_per_wave: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            map_rows: MAP_ROWS,
            map_cols: MAP_COLS,
            spawn_interval: SPAWN_INTERVAL,
            enemies_per_wave: ENEMIES_PER_WAVE,
            enemy_fire_chance: ENEMY_FIRE_CHANCE,
            kills_per_wave: KILLS_PER_WAVE,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rules: Rules,
    pub rng: Pcg32,
    pub grid: Grid,
    pub session: Session,
    pub player: Player,
    /// Player position as last published for enemies to chase
    pub player_marker: Vec2,
    pub enemies: SlotMap<EnemyKey, Enemy>,
    pub projectiles: SlotMap<ProjectileKey, Projectile>,
    pub camera: Camera,
    /// Seconds accumulated toward the next spawn attempt
    pub spawn_timer: f32,
    /// Seconds accumulated toward the next contact damage check
    pub contact_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a game sitting in the menu with a map already generated
    pub fn new(rules: Rules, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = map::generate(rules.map_rows, rules.map_cols, &mut rng);
        let spawn = safe_spawn(&grid, &mut rng);

        Self {
            seed,
            rules,
            rng,
            grid,
            session: Session::new(),
            player: Player::new(spawn),
            player_marker: spawn,
            enemies: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            camera: Camera::default(),
            spawn_timer: rules.spawn_interval,
            contact_timer: 0.0,
            time_ticks: 0,
        }
    }

    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self::new(settings.rules(), seed)
    }

    /// Fresh map, player and empty slot maps for a new run
    fn begin_run(&mut self) {
        self.grid = map::generate(self.rules.map_rows, self.rules.map_cols, &mut self.rng);
        let spawn = safe_spawn(&self.grid, &mut self.rng);
        self.player = Player::new(spawn);
        self.player_marker = spawn;
        self.enemies.clear();
        self.projectiles.clear();
        self.spawn_timer = self.rules.spawn_interval;
        self.contact_timer = 0.0;
    }

    /// Menu -> Playing
    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.begin_run();
        true
    }

    /// GameOver (or Paused) -> Playing with a new map and full ammo
    pub fn restart(&mut self) -> bool {
        if !self.session.restart() {
            return false;
        }
        self.begin_run();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.session.toggle_pause()
    }

    pub fn to_menu(&mut self) {
        self.session.to_menu();
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// Live enemy limit for the current wave
    pub fn enemy_cap(&self) -> usize {
        self.session.wave() as usize * self.rules.enemies_per_wave
    }

    pub fn spawn_enemy(&mut self, pos: Vec2) -> EnemyKey {
        let handle = self.enemies.insert(Enemy::new(pos, self.session.wave()));
        log::debug!("Spawned enemy {:?} at {:?}", handle, pos);
        handle
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile) -> ProjectileKey {
        self.projectiles.insert(projectile)
    }

    /// Publish the player's resolved position for this tick
    pub fn publish_player_position(&mut self) {
        self.player_marker = self.player.pos;
    }
}
