//! Cell states and the square play grid.

use alloc::vec::Vec;

use crate::common::{BoardError, Coord};

/// State of one grid square.
///
/// A cell only ever moves forward: `Empty`→`Ship` while placing, and
/// `Empty`/`Ship`→`Miss`/`Hit` when fired upon. [`Grid::mark`] enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Ship,
    Hit,
    Miss,
}

impl Cell {
    /// A cell that has not been fired upon yet.
    pub fn is_untried(self) -> bool {
        matches!(self, Cell::Empty | Cell::Ship)
    }
}

/// A square matrix of cells.
///
/// The side length is fixed per match but chosen at runtime; the standard
/// game uses 10.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-`Empty` grid with side length `size`.
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: (0..size * size).map(|_| Cell::Empty).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row < self.size && col < self.size
    }

    fn index(&self, (row, col): Coord) -> usize {
        row * self.size + col
    }

    /// Cell state at `coord`.
    pub fn get(&self, coord: Coord) -> Result<Cell, BoardError> {
        if !self.contains(coord) {
            return Err(BoardError::OutOfBounds {
                row: coord.0,
                col: coord.1,
            });
        }
        Ok(self.cells[self.index(coord)])
    }

    /// True when `coord` is in bounds and has not been fired upon.
    pub fn is_untried(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Ok(cell) if cell.is_untried())
    }

    /// Transition the cell at `coord` to `next`, rejecting any transition
    /// that would rewind play: resolved cells stay resolved and ship cells
    /// cannot be placed twice.
    pub fn mark(&mut self, coord: Coord, next: Cell) -> Result<(), BoardError> {
        let current = self.get(coord)?;
        let allowed = matches!(
            (current, next),
            (Cell::Empty, Cell::Ship)
                | (Cell::Empty, Cell::Hit)
                | (Cell::Empty, Cell::Miss)
                | (Cell::Ship, Cell::Hit)
                | (Cell::Ship, Cell::Miss)
        );
        if !allowed {
            return Err(match current {
                Cell::Hit | Cell::Miss => BoardError::AlreadyFired {
                    row: coord.0,
                    col: coord.1,
                },
                _ => BoardError::InvalidTransition,
            });
        }
        let idx = self.index(coord);
        self.cells[idx] = next;
        Ok(())
    }

    /// Number of cells currently in state `state`.
    pub fn count(&self, state: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Row-major iterator over the coordinates not yet fired upon.
    pub fn untried_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.is_untried().then_some((i / self.size, i % self.size))
        })
    }
}
