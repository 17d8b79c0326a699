//! Fleet board: ship placement and shot resolution.

use alloc::vec::Vec;

use rand::Rng;

use crate::common::{BoardError, Coord, ShotResult};
use crate::grid::{Cell, Grid};
use crate::ship::{Orientation, Ship, ShipClass};

/// Cap on random placement attempts per ship before giving up.
const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// One side's waters: the cell grid plus the placement records needed to
/// answer sunk queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    ships: Vec<Ship>,
}

impl Board {
    /// Create an empty board with side length `size`.
    pub fn new(size: usize) -> Self {
        Board {
            grid: Grid::new(size),
            ships: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Place a ship with its bow at (`row`, `col`).
    pub fn place(
        &mut self,
        class: ShipClass,
        orientation: Orientation,
        row: usize,
        col: usize,
    ) -> Result<(), BoardError> {
        let ship = Ship::new(class, orientation, row, col, self.grid.size())?;
        if ship.cells().any(|c| self.grid.get(c) != Ok(Cell::Empty)) {
            return Err(BoardError::ShipOverlaps);
        }
        for c in ship.cells() {
            self.grid.mark(c, Cell::Ship)?;
        }
        self.ships.push(ship);
        Ok(())
    }

    /// Place a ship at a random non-overlapping position.
    pub fn place_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        class: ShipClass,
    ) -> Result<(), BoardError> {
        let n = self.grid.size();
        if class.length() > n {
            return Err(BoardError::ShipOutOfBounds);
        }
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_row, max_col) = match orientation {
                Orientation::Horizontal => (n - 1, n - class.length()),
                Orientation::Vertical => (n - class.length(), n - 1),
            };
            let row = rng.random_range(0..=max_row);
            let col = rng.random_range(0..=max_col);
            let ship = Ship::new(class, orientation, row, col, n)?;
            if ship.cells().all(|c| self.grid.get(c) == Ok(Cell::Empty)) {
                for c in ship.cells() {
                    self.grid.mark(c, Cell::Ship)?;
                }
                self.ships.push(ship);
                return Ok(());
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Place a whole fleet at random positions.
    pub fn place_fleet_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        fleet: &[ShipClass],
    ) -> Result<(), BoardError> {
        for &class in fleet {
            self.place_random(rng, class)?;
        }
        Ok(())
    }

    /// Resolve a shot at `coord`: `Ship`→`Hit`, `Empty`→`Miss`, exactly one
    /// cell mutated. Refiring a resolved cell is an error; callers are
    /// expected to check first.
    pub fn fire(&mut self, coord: Coord) -> Result<ShotResult, BoardError> {
        match self.grid.get(coord)? {
            Cell::Ship => {
                self.grid.mark(coord, Cell::Hit)?;
                Ok(ShotResult::Hit)
            }
            Cell::Empty => {
                self.grid.mark(coord, Cell::Miss)?;
                Ok(ShotResult::Miss)
            }
            Cell::Hit | Cell::Miss => Err(BoardError::AlreadyFired {
                row: coord.0,
                col: coord.1,
            }),
        }
    }

    /// The ship covering `coord`, if every cell of it has been hit.
    pub fn sunk_ship_at(&self, coord: Coord) -> Option<&Ship> {
        self.ships
            .iter()
            .find(|s| s.covers(coord))
            .filter(|s| s.is_sunk(&self.grid))
    }

    /// Number of ship cells not yet hit. Victory is this reaching zero on
    /// the opposing board.
    pub fn cells_remaining(&self) -> usize {
        self.grid.count(Cell::Ship)
    }
}
