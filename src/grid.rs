use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Open,
    Blocked,
}

impl Cell {
    fn symbol(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Blocked => '#',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The 4-connected neighbours that don't underflow. Upper bounds are the caller's problem.
    pub fn neighbors(self) -> impl Iterator<Item = CellPos> {
        let CellPos { row, col } = self;
        [
            row.checked_sub(1).map(|r| CellPos::new(r, col)),
            Some(CellPos::new(row + 1, col)),
            col.checked_sub(1).map(|c| CellPos::new(row, c)),
            Some(CellPos::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Dense `rows x cols` array of open/blocked cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A fully blocked grid. Anything smaller than 3x3 has no interior.
    pub fn blocked(rows: usize, cols: usize) -> Result<Self> {
        if rows < 3 || cols < 3 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Blocked; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn get(&self, pos: CellPos) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    /// Sets a cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: CellPos, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[pos.row * self.cols + pos.col] = cell;
        }
    }

    pub fn is_open(&self, pos: CellPos) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    /// Out-of-bounds counts as blocked.
    pub fn is_blocked(&self, pos: CellPos) -> bool {
        !self.is_open(pos)
    }

    /// Blocked test for signed coordinates, as produced by mapping world pixels to cells.
    pub fn is_blocked_at(&self, row: i64, col: i64) -> bool {
        if row < 0 || col < 0 {
            return true;
        }
        self.is_blocked(CellPos::new(row as usize, col as usize))
    }

    pub fn is_interior(&self, pos: CellPos) -> bool {
        pos.row >= 1 && pos.col >= 1 && pos.row + 1 < self.rows && pos.col + 1 < self.cols
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Open).count()
    }

    pub fn open_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Open)
            .map(move |(idx, _)| CellPos::new(idx / self.cols, idx % self.cols))
    }

    /// Forces the outer ring of rows and columns to blocked.
    pub fn seal_border(&mut self) {
        for row in 0..self.rows {
            self.set(CellPos::new(row, 0), Cell::Blocked);
            self.set(CellPos::new(row, self.cols - 1), Cell::Blocked);
        }
        for col in 0..self.cols {
            self.set(CellPos::new(0, col), Cell::Blocked);
            self.set(CellPos::new(self.rows - 1, col), Cell::Blocked);
        }
    }

    pub fn border_is_sealed(&self) -> bool {
        (0..self.rows).all(|row| {
            self.is_blocked(CellPos::new(row, 0)) && self.is_blocked(CellPos::new(row, self.cols - 1))
        }) && (0..self.cols).all(|col| {
            self.is_blocked(CellPos::new(0, col)) && self.is_blocked(CellPos::new(self.rows - 1, col))
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.cells.chunks(self.cols).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in line {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

/// Parses `#` (blocked) and `.` (open) lines. Blank lines are skipped.
impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let rows = lines.len();
        let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        let mut grid = Grid::blocked(rows, cols)?;

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(Error::GridParse(format!(
                    "line {} has {} cells, expected {}",
                    row + 1,
                    line.chars().count(),
                    cols
                )));
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::Blocked,
                    '.' => Cell::Open,
                    other => {
                        return Err(Error::GridParse(format!(
                            "unexpected {other:?} at line {}",
                            row + 1
                        )))
                    }
                };
                grid.set(CellPos::new(row, col), cell);
            }
        }
        Ok(grid)
    }
}
