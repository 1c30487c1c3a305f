//! Maze carving.
//!
//! The base maze is a randomized depth-first backtracker that moves two cells
//! per step, so corridors sit on odd coordinates and are separated by walls
//! exactly one cell thick. Rooms are an optional second pass that only ever
//! opens cells strictly inside the border.

use log::{debug, trace, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::grid::{Cell, CellPos, Grid};

/// Two-cell carve steps as `(row, col)` offsets.
const CARVE_STEPS: [(isize, isize); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

/// Room footprints in the order they unlock.
pub const ROOM_SHAPES: [RoomShape; 4] = [
    RoomShape::new(2, 3),
    RoomShape::new(3, 4),
    RoomShape::new(6, 6),
    RoomShape::new(10, 10),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomShape {
    /// Extent along columns.
    pub width: usize,
    /// Extent along rows.
    pub height: usize,
}

impl RoomShape {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// A cell whose carve directions are still being tried.
struct Frame {
    cell: CellPos,
    steps: [(isize, isize); 4],
    next: usize,
}

impl Frame {
    fn enter<R: Rng + ?Sized>(cell: CellPos, rng: &mut R) -> Self {
        Self {
            cell,
            steps: shuffled_steps(rng),
            next: 0,
        }
    }
}

fn shuffled_steps<R: Rng + ?Sized>(rng: &mut R) -> [(isize, isize); 4] {
    let mut steps = CARVE_STEPS;
    steps.shuffle(rng);
    steps
}

#[derive(Clone, Debug)]
pub struct MazeGenerator {
    room_shapes: Vec<RoomShape>,
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new(ROOM_SHAPES.to_vec())
    }
}

impl MazeGenerator {
    pub fn new(room_shapes: Vec<RoomShape>) -> Self {
        Self { room_shapes }
    }

    /// Carves a maze from `(1, 1)` and seals the border.
    ///
    /// Every cell opened here belongs to one 4-connected component. The
    /// carve uses an explicit stack so large grids can't overflow the call
    /// stack; directions are shuffled once per cell on first visit, which
    /// draws from `rng` in the same order a recursive carve would.
    pub fn generate<R>(&self, rows: usize, cols: usize, rng: &mut R) -> Result<Grid>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Grid::blocked(rows, cols)?;

        let start = CellPos::new(1, 1);
        grid.set(start, Cell::Open);
        let mut stack = vec![Frame::enter(start, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.steps.len() {
                stack.pop();
                continue;
            }
            let (dr, dc) = frame.steps[frame.next];
            frame.next += 1;
            let cell = frame.cell;

            let Some(target) = carve_target(&grid, cell, dr, dc) else {
                continue;
            };
            if grid.is_open(target) {
                continue;
            }
            let between = CellPos::new(
                (cell.row as isize + dr / 2) as usize,
                (cell.col as isize + dc / 2) as usize,
            );
            grid.set(between, Cell::Open);
            grid.set(target, Cell::Open);
            stack.push(Frame::enter(target, rng));
        }

        grid.seal_border();
        trace!("carved {rows}x{cols} maze:\n{grid}");
        Ok(grid)
    }

    /// Opens the first `count` shapes at random anchors. Rooms may overlap.
    /// A shape that cannot fit strictly inside the border is skipped.
    /// Returns the number of rooms carved.
    pub fn carve_rooms<R>(&self, grid: &mut Grid, count: usize, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut carved = 0;
        for shape in self.room_shapes.iter().take(count) {
            // Anchors range over [1, dim - 2 - extent] so the far edge stays off the border.
            if shape.width + 3 > grid.cols() || shape.height + 3 > grid.rows() {
                warn!(
                    "room {}x{} does not fit a {}x{} grid, skipping",
                    shape.width,
                    shape.height,
                    grid.rows(),
                    grid.cols()
                );
                continue;
            }
            let col = rng.gen_range(1..=grid.cols() - 2 - shape.width);
            let row = rng.gen_range(1..=grid.rows() - 2 - shape.height);
            for r in row..row + shape.height {
                for c in col..col + shape.width {
                    grid.set(CellPos::new(r, c), Cell::Open);
                }
            }
            debug!(
                "carved {}x{} room at row {row}, col {col}",
                shape.width, shape.height
            );
            carved += 1;
        }
        carved
    }
}

/// The cell two steps away, if it lies within the interior.
fn carve_target(grid: &Grid, from: CellPos, dr: isize, dc: isize) -> Option<CellPos> {
    let row = from.row as isize + dr;
    let col = from.col as isize + dc;
    if row < 1 || col < 1 || row > grid.rows() as isize - 2 || col > grid.cols() as isize - 2 {
        return None;
    }
    Some(CellPos::new(row as usize, col as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::reachability::reachable_from;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn rejects_degenerate_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        let generator = MazeGenerator::default();
        assert!(matches!(
            generator.generate(2, 9, &mut rng),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(generator.generate(9, 1, &mut rng).is_err());
    }

    #[test]
    fn border_is_always_blocked() {
        let generator = MazeGenerator::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for (rows, cols) in [(3, 3), (4, 7), (9, 12), (15, 15), (22, 30)] {
                let grid = generator.generate(rows, cols, &mut rng).unwrap();
                assert!(grid.border_is_sealed(), "{rows}x{cols} seed {seed}\n{grid}");
                assert!(grid.is_open(CellPos::new(1, 1)));
            }
        }
    }

    #[test]
    fn base_maze_is_one_component() {
        let generator = MazeGenerator::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for (rows, cols) in [(9, 12), (11, 11), (18, 24), (33, 45)] {
                let grid = generator.generate(rows, cols, &mut rng).unwrap();
                let reachable = reachable_from(&grid, CellPos::new(1, 1));
                assert_eq!(reachable.len(), grid.open_count());
            }
        }
    }

    #[test]
    fn visits_every_odd_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = MazeGenerator::default().generate(21, 31, &mut rng).unwrap();
        for row in (1..20).step_by(2) {
            for col in (1..30).step_by(2) {
                assert!(grid.is_open(CellPos::new(row, col)));
            }
        }
        // Even-even cells are wall junctions and never carved.
        for row in (2..20).step_by(2) {
            for col in (2..30).step_by(2) {
                assert!(grid.is_blocked(CellPos::new(row, col)));
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let generator = MazeGenerator::default();
        let a = generator
            .generate(25, 31, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = generator
            .generate(25, 31, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn large_grid_does_not_overflow() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = MazeGenerator::default().generate(401, 401, &mut rng).unwrap();
        assert_eq!(grid.open_count(), 200 * 200 + (200 * 200 - 1));
    }

    #[test]
    fn step_shuffle_reaches_every_order() {
        let mut rng = StdRng::seed_from_u64(5);
        let seen: HashSet<_> = (0..2_400).map(|_| shuffled_steps(&mut rng)).collect();
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn room_count_is_capped_by_shapes() {
        let generator = MazeGenerator::default();
        let mut rng = StdRng::seed_from_u64(12);
        let mut grid = generator.generate(31, 31, &mut rng).unwrap();
        assert_eq!(generator.carve_rooms(&mut grid, 0, &mut rng), 0);
        assert_eq!(generator.carve_rooms(&mut grid, 99, &mut rng), ROOM_SHAPES.len());
    }

    #[test]
    fn rooms_never_breach_border() {
        let generator = MazeGenerator::default();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = generator.generate(15, 15, &mut rng).unwrap();
            let before = grid.clone();
            let carved = generator.carve_rooms(&mut grid, 4, &mut rng);
            assert_eq!(carved, 4);
            assert!(grid.border_is_sealed());
            // Rooms only add openings.
            for pos in before.open_cells() {
                assert!(grid.is_open(pos));
            }
        }
    }

    #[test]
    fn room_opens_full_rectangle() {
        let generator = MazeGenerator::new(vec![RoomShape::new(3, 2)]);
        let mut grid = Grid::blocked(5, 6).unwrap();
        // Only anchor (1, 1) fits: cols 1..=3, rows 1..=2.
        let carved = generator.carve_rooms(&mut grid, 1, &mut StdRng::seed_from_u64(0));
        assert_eq!(carved, 1);
        assert_eq!(grid.to_string(), "######\n#...##\n#...##\n######\n######");
    }

    #[test]
    fn oversized_room_is_skipped() {
        let generator = MazeGenerator::new(vec![RoomShape::new(10, 10), RoomShape::new(2, 2)]);
        let mut rng = StdRng::seed_from_u64(4);
        let mut grid = generator.generate(9, 12, &mut rng).unwrap();
        let carved = generator.carve_rooms(&mut grid, 2, &mut rng);
        assert_eq!(carved, 1);
        assert!(grid.border_is_sealed());
    }
}
