//! Per-axis collision against the grid.
//!
//! Each axis is tried on its own so a diagonal push into a wall slides along
//! it. Horizontal is always resolved first and vertical is tested from the
//! already-updated `x`. There is no swept test: a step larger than
//! [`WorldConfig::max_safe_step`] can jump a one-cell wall.

use crate::config::WorldConfig;
use crate::grid::Grid;

/// Axis-aligned box in world pixels, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; boxes that only share an edge don't overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn inset(&self, margin: f32) -> Aabb {
        Aabb::new(
            self.x + margin,
            self.y + margin,
            self.w - 2.0 * margin,
            self.h - 2.0 * margin,
        )
    }

    pub fn corners(&self) -> [(f32, f32); 4] {
        let (right, bottom) = (self.x + self.w, self.y + self.h);
        [
            (self.x, self.y),
            (right, self.y),
            (self.x, bottom),
            (right, bottom),
        ]
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CollisionResolver {
    tile_px: f32,
    margin: f32,
}

impl CollisionResolver {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            tile_px: config.tile_px(),
            margin: config.collision_margin,
        }
    }

    /// Grid cell containing a world point, as signed `(row, col)`.
    pub fn cell_at(&self, x: f32, y: f32) -> (i64, i64) {
        (
            (y / self.tile_px).floor() as i64,
            (x / self.tile_px).floor() as i64,
        )
    }

    /// Whether any inset corner of `bounds` falls in a blocked cell.
    pub fn is_blocked(&self, grid: &Grid, bounds: Aabb) -> bool {
        bounds.inset(self.margin).corners().iter().any(|&(x, y)| {
            let (row, col) = self.cell_at(x, y);
            grid.is_blocked_at(row, col)
        })
    }

    /// Resolves a requested move and returns the new top-left.
    ///
    /// A zero component always commits. A box that already overlaps a wall
    /// is not pushed out; its moves are simply tested like any other.
    pub fn resolve(&self, grid: &Grid, bounds: Aabb, dx: f32, dy: f32) -> (f32, f32) {
        let mut x = bounds.x;
        let mut y = bounds.y;

        if dx != 0.0 && !self.is_blocked(grid, Aabb { x: x + dx, ..bounds }) {
            x += dx;
        }
        if dy != 0.0 && !self.is_blocked(grid, Aabb { x, y: y + dy, ..bounds }) {
            y += dy;
        }
        (x, y)
    }
}
