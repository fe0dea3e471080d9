//! Collision detection and response against the tile grid
//!
//! Entities are circles on the ground plane, walls are axis-aligned squares.
//! Everything here is a pure query or an in-place push; nothing holds on to
//! the grid past the call.

use glam::Vec2;
use rand::Rng;

use super::map::{Grid, Tile};
use crate::consts::{SAFE_SPAWN_ATTEMPTS, TILE_SIZE};

/// Result of a circle-vs-tile check
#[derive(Debug, Clone)]
pub struct Contact {
    /// Whether the circle overlaps the tile
    pub hit: bool,
    /// Closest point on the tile to the circle center
    pub point: Vec2,
    /// Push direction (from the tile toward the circle center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// World-space center of cell (col, row)
pub fn grid_to_world(grid: &Grid, col: i32, row: i32) -> Vec2 {
    let half_w = grid.cols() as f32 * TILE_SIZE / 2.0;
    let half_h = grid.rows() as f32 * TILE_SIZE / 2.0;
    Vec2::new(
        col as f32 * TILE_SIZE - half_w + TILE_SIZE / 2.0,
        row as f32 * TILE_SIZE - half_h + TILE_SIZE / 2.0,
    )
}

/// Cell (col, row) containing a world position. Floors toward negative
/// infinity, so positions left of / above the grid give negative indices.
pub fn world_to_grid(grid: &Grid, pos: Vec2) -> (i32, i32) {
    let half_w = grid.cols() as f32 * TILE_SIZE / 2.0;
    let half_h = grid.rows() as f32 * TILE_SIZE / 2.0;
    let col = ((pos.x + half_w) / TILE_SIZE).floor() as i32;
    let row = ((pos.y + half_h) / TILE_SIZE).floor() as i32;
    (col, row)
}

/// True for wall cells and for anything outside the grid
pub fn is_solid(grid: &Grid, pos: Vec2) -> bool {
    let (col, row) = world_to_grid(grid, pos);
    grid.get(col, row).is_none_or(|tile| tile == Tile::Wall)
}

/// Axis-aligned bounds (min, max) of cell (col, row)
pub fn tile_bounds(grid: &Grid, col: i32, row: i32) -> (Vec2, Vec2) {
    let center = grid_to_world(grid, col, row);
    let half = Vec2::splat(TILE_SIZE / 2.0);
    (center - half, center + half)
}

/// Check a circle against the square of cell (col, row)
pub fn circle_tile_contact(grid: &Grid, pos: Vec2, radius: f32, col: i32, row: i32) -> Contact {
    let (min, max) = tile_bounds(grid, col, row);
    let closest = pos.clamp(min, max);
    let offset = pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return Contact::miss();
    }

    let dist = dist_sq.sqrt();
    // Center sits on or inside the tile: no usable direction, push along +x
    let normal = if dist == 0.0 { Vec2::X } else { offset / dist };

    Contact {
        hit: true,
        point: closest,
        normal,
        penetration: radius - dist,
    }
}

/// Push a circle out of the walls around it, in place.
///
/// Scans the 3x3 block of cells around the circle's cell row by row and
/// resolves each overlapping wall independently, using the position as
/// already corrected by earlier cells in the scan.
pub fn resolve_collision(grid: &Grid, pos: &mut Vec2, radius: f32) {
    let (center_col, center_row) = world_to_grid(grid, *pos);

    for row in center_row - 1..=center_row + 1 {
        for col in center_col - 1..=center_col + 1 {
            if !grid.is_wall(col, row) {
                continue;
            }
            let contact = circle_tile_contact(grid, *pos, radius, col, row);
            if contact.hit {
                *pos += contact.normal * contact.penetration;
            }
        }
    }
}

/// Pick a random interior floor cell center.
///
/// Falls back to the origin after [`SAFE_SPAWN_ATTEMPTS`] misses.
pub fn safe_spawn<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Vec2 {
    if grid.rows() >= 3 && grid.cols() >= 3 {
        for _ in 0..SAFE_SPAWN_ATTEMPTS {
            let col = rng.random_range(1..grid.cols() - 1) as i32;
            let row = rng.random_range(1..grid.rows() - 1) as i32;
            if grid.get(col, row) == Some(Tile::Floor) {
                return grid_to_world(grid, col, row);
            }
        }
    }

    log::warn!(
        "Failed to find safe spawn after {} attempts, using origin",
        SAFE_SPAWN_ATTEMPTS
    );
    Vec2::ZERO
}
