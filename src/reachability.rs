use std::collections::VecDeque;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{CellPos, Grid};

/// Cells connected to a start cell through 4-directional open moves.
#[derive(Clone, Debug)]
pub struct ReachableSet {
    cells: Vec<CellPos>,
    seen: Vec<bool>,
    cols: usize,
}

impl ReachableSet {
    /// An empty set sized to `grid`.
    fn empty_for(grid: &Grid) -> Self {
        Self {
            cells: Vec::new(),
            seen: vec![false; grid.rows() * grid.cols()],
            cols: grid.cols(),
        }
    }

    /// Marks `pos`; false if it was already a member.
    fn insert(&mut self, pos: CellPos) -> bool {
        let idx = pos.row * self.cols + pos.col;
        if self.seen[idx] {
            return false;
        }
        self.seen[idx] = true;
        self.cells.push(pos);
        true
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.col < self.cols
            && self
                .seen
                .get(pos.row * self.cols + pos.col)
                .copied()
                .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Members in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells.iter().copied()
    }

    /// A uniformly chosen member.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<CellPos> {
        self.cells.choose(rng).copied()
    }
}

/// Breadth-first flood over open cells from `start`.
///
/// `start` should be open. A blocked start yields just `{start}` and an
/// out-of-bounds start yields the empty set.
pub fn reachable_from(grid: &Grid, start: CellPos) -> ReachableSet {
    let mut reachable = ReachableSet::empty_for(grid);
    if !grid.in_bounds(start) {
        return reachable;
    }
    reachable.insert(start);
    if grid.is_blocked(start) {
        debug!("reachability started from blocked cell {start:?}");
        return reachable;
    }

    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(pos) = queue.pop_front() {
        for next in pos.neighbors() {
            if grid.is_open(next) && reachable.insert(next) {
                queue.push_back(next);
            }
        }
    }
    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TWO_ROOMS: &str = "
        #######
        #..#..#
        #..#..#
        #######
    ";

    #[test]
    fn floods_only_connected_cells() {
        let grid: Grid = TWO_ROOMS.parse().unwrap();
        let left = reachable_from(&grid, CellPos::new(1, 1));
        assert_eq!(left.len(), 4);
        assert!(left.contains(CellPos::new(2, 2)));
        assert!(!left.contains(CellPos::new(1, 4)));
        assert!(!left.contains(CellPos::new(1, 3)));

        let right = reachable_from(&grid, CellPos::new(2, 5));
        assert_eq!(right.len(), 4);
        assert!(right.contains(CellPos::new(1, 4)));
    }

    #[test]
    fn start_is_member_and_cells_are_open_and_unique() {
        let grid: Grid = "
            #####
            #...#
            #.#.#
            #...#
            #####
        "
        .parse()
        .unwrap();
        let start = CellPos::new(3, 3);
        let reachable = reachable_from(&grid, start);
        assert_eq!(reachable.iter().next(), Some(start));
        assert_eq!(reachable.len(), 8);
        let mut cells: Vec<_> = reachable.iter().collect();
        assert!(cells.iter().all(|p| grid.is_open(*p)));
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn diagonal_is_not_adjacent() {
        let grid: Grid = "
            ####
            #.##
            ##.#
            ####
        "
        .parse()
        .unwrap();
        assert_eq!(reachable_from(&grid, CellPos::new(1, 1)).len(), 1);
    }

    #[test]
    fn blocked_start_does_not_expand() {
        let grid: Grid = TWO_ROOMS.parse().unwrap();
        let reachable = reachable_from(&grid, CellPos::new(1, 3));
        assert_eq!(reachable.iter().collect::<Vec<_>>(), vec![CellPos::new(1, 3)]);
        assert!(reachable_from(&grid, CellPos::new(9, 9)).is_empty());
    }

    #[test]
    fn samples_stay_inside() {
        let grid: Grid = TWO_ROOMS.parse().unwrap();
        let reachable = reachable_from(&grid, CellPos::new(1, 1));
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let pos = reachable.sample(&mut rng).unwrap();
            assert!(reachable.contains(pos));
            assert!(pos.col < 3);
        }
    }
}
