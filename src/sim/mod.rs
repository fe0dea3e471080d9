//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (slot map order)
//! - No rendering or platform dependencies

pub mod aim;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod entities;
pub mod map;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use aim::{Camera, Ray};
pub use clock::FixedStep;
pub use collision::{grid_to_world, is_solid, resolve_collision, safe_spawn, world_to_grid};
pub use entities::{Ammo, Enemy, MoveInput, Owner, Player, Projectile, Weapon};
pub use map::{Grid, Tile, generate};
pub use session::{GamePhase, Session};
pub use snapshot::Snapshot;
pub use state::{EnemyKey, GameState, ProjectileKey, Rules};
pub use tick::{TickInput, tick};
