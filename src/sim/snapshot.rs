//! Read-only view of the game for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::entities::{Ammo, Owner, Weapon};
use super::session::GamePhase;
use super::state::{EnemyKey, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub yaw: f32,
    pub weapon: Weapon,
    pub ammo: Ammo,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub key: EnemyKey,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub yaw: f32,
    pub owner: Owner,
    pub color: u32,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub health: f32,
    pub wave: u32,
    pub time_ticks: u64,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let player = &self.player;
        Snapshot {
            phase: self.session.phase(),
            score: self.session.score(),
            health: self.session.health(),
            wave: self.session.wave(),
            time_ticks: self.time_ticks,
            player: PlayerView {
                pos: player.pos,
                yaw: player.yaw,
                weapon: player.weapon,
                ammo: player.ammo(player.weapon),
            },
            enemies: self
                .enemies
                .iter()
                .map(|(key, enemy)| EnemyView {
                    key,
                    pos: enemy.pos,
                    health: enemy.health,
                    max_health: enemy.max_health,
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|(_, shot)| ProjectileView {
                    pos: shot.pos,
                    yaw: shot.yaw,
                    owner: shot.owner,
                    color: shot.color,
                })
                .collect(),
        }
    }
}
