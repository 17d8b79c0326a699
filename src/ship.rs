//! Ship classes and placed ships.

use crate::common::{BoardError, Coord};
use crate::grid::{Cell, Grid};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A class of ship: display name and hull length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    name: &'static str,
    length: usize,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship placed on a grid.
///
/// The placement record is the ship's coordinate set; whether it is sunk is
/// always computed by scanning that set against the grid, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    class: ShipClass,
    orientation: Orientation,
    row: usize,
    col: usize,
}

impl Ship {
    /// Place a ship with its bow at (`row`, `col`). Fails if the hull would
    /// extend past the edge of a `grid_size`-sided board.
    pub fn new(
        class: ShipClass,
        orientation: Orientation,
        row: usize,
        col: usize,
        grid_size: usize,
    ) -> Result<Self, BoardError> {
        let len = class.length();
        let fits = match orientation {
            Orientation::Horizontal => row < grid_size && col + len <= grid_size,
            Orientation::Vertical => col < grid_size && row + len <= grid_size,
        };
        if !fits {
            return Err(BoardError::ShipOutOfBounds);
        }
        Ok(Ship {
            class,
            orientation,
            row,
            col,
        })
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Bow position (row, col).
    pub fn origin(&self) -> Coord {
        (self.row, self.col)
    }

    /// The recorded coordinate set, bow to stern.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let (dr, dc) = match self.orientation {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        };
        (0..self.class.length()).map(move |i| (self.row + dr * i, self.col + dc * i))
    }

    pub fn covers(&self, coord: Coord) -> bool {
        self.cells().any(|c| c == coord)
    }

    /// Every recorded coordinate is `Hit` on `grid`.
    pub fn is_sunk(&self, grid: &Grid) -> bool {
        self.cells().all(|c| grid.get(c) == Ok(Cell::Hit))
    }
}
