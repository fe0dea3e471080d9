//! Procedural tile maze generation
//!
//! A random walk carves floor out of a solid block of walls. The walk is
//! contiguous from the center, so everything it carves is reachable from the
//! start cell; corridor widening can open extra pockets around it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_MAP_SIZE, WALK_COVERAGE, WIDEN_CHANCE};

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    #[default]
    Wall,
}

/// Rectangular tile matrix stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// A grid where every cell is `fill`. Edges are capped at `MAX_MAP_SIZE`.
    pub fn filled(rows: usize, cols: usize, fill: Tile) -> Self {
        if rows > MAX_MAP_SIZE || cols > MAX_MAP_SIZE {
            log::warn!("Map {}x{} too large, capping edges at {}", cols, rows, MAX_MAP_SIZE);
        }
        let rows = rows.min(MAX_MAP_SIZE);
        let cols = cols.min(MAX_MAP_SIZE);
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tile at (col, row), `None` outside the grid
    pub fn get(&self, col: i32, row: i32) -> Option<Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    pub fn set(&mut self, col: usize, row: usize, tile: Tile) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = tile;
        }
    }

    pub fn is_wall(&self, col: i32, row: i32) -> bool {
        self.get(col, row) == Some(Tile::Wall)
    }

    /// Number of floor cells
    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|t| **t == Tile::Floor).count()
    }

    fn seal_border(&mut self) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        for row in 0..self.rows {
            self.set(0, row, Tile::Wall);
            self.set(self.cols - 1, row, Tile::Wall);
        }
        for col in 0..self.cols {
            self.set(col, 0, Tile::Wall);
            self.set(col, self.rows - 1, Tile::Wall);
        }
    }
}

/// Generate a maze of exactly `rows` x `cols` cells with a solid border
/// (edges above `MAX_MAP_SIZE` are capped).
///
/// Grids too small to have an interior come back as all walls.
pub fn generate<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Grid {
    let mut grid = Grid::filled(rows, cols, Tile::Wall);
    let (rows, cols) = (grid.rows(), grid.cols());
    if rows < 3 || cols < 3 {
        return grid;
    }

    let mut x = cols / 2;
    let mut y = rows / 2;
    let max_steps = (rows as f64 * cols as f64 * WALK_COVERAGE).floor() as usize;

    grid.set(x, y, Tile::Floor);

    for _ in 0..max_steps {
        // 0: up, 1: right, 2: down, 3: left
        match rng.random_range(0..4) {
            0 if y > 1 => y -= 1,
            1 if x < cols - 2 => x += 1,
            2 if y < rows - 2 => y += 1,
            3 if x > 1 => x -= 1,
            _ => {}
        }

        grid.set(x, y, Tile::Floor);

        if rng.random_bool(WIDEN_CHANCE) && y > 1 && y < rows - 2 && x > 1 && x < cols - 2 {
            grid.set(x, y + 1, Tile::Floor);
            grid.set(x, y - 1, Tile::Floor);
            grid.set(x + 1, y, Tile::Floor);
            grid.set(x - 1, y, Tile::Floor);
        }
    }

    grid.seal_border();

    log::info!(
        "Generated {}x{} map with {} floor cells",
        cols,
        rows,
        grid.floor_count()
    );
    grid
}
