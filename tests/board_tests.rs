use broadside::{
    fleet_for_grid, Board, BoardError, Cell, GameConfig, Grid, Orientation, ShipClass, ShotResult,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const CARRIER: ShipClass = ShipClass::new("Carrier", 5);
const CRUISER: ShipClass = ShipClass::new("Cruiser", 3);

#[test]
fn place_fire_and_sink() {
    let mut board = Board::new(10);
    board.place(CARRIER, Orientation::Horizontal, 0, 0).unwrap();

    for c in 0..CARRIER.length() {
        assert_eq!(board.fire((0, c)).unwrap(), ShotResult::Hit);
    }
    let sunk = board.sunk_ship_at((0, CARRIER.length() - 1)).unwrap();
    assert_eq!(sunk.class().name(), "Carrier");
    assert_eq!(board.cells_remaining(), 0);
}

#[test]
fn sunk_requires_every_cell_hit() {
    let mut board = Board::new(10);
    board.place(CRUISER, Orientation::Vertical, 2, 2).unwrap();

    assert_eq!(board.fire((2, 2)).unwrap(), ShotResult::Hit);
    assert_eq!(board.fire((3, 2)).unwrap(), ShotResult::Hit);
    assert!(board.sunk_ship_at((3, 2)).is_none());
    assert_eq!(board.fire((4, 2)).unwrap(), ShotResult::Hit);
    assert!(board.sunk_ship_at((4, 2)).is_some());
}

#[test]
fn refire_and_out_of_bounds_are_errors() {
    let mut board = Board::new(10);
    board.place(CRUISER, Orientation::Horizontal, 4, 2).unwrap();

    assert_eq!(board.fire((0, 0)).unwrap(), ShotResult::Miss);
    assert_eq!(
        board.fire((0, 0)).unwrap_err(),
        BoardError::AlreadyFired { row: 0, col: 0 }
    );
    assert_eq!(board.fire((4, 2)).unwrap(), ShotResult::Hit);
    assert_eq!(
        board.fire((4, 2)).unwrap_err(),
        BoardError::AlreadyFired { row: 4, col: 2 }
    );
    assert_eq!(
        board.fire((10, 0)).unwrap_err(),
        BoardError::OutOfBounds { row: 10, col: 0 }
    );
}

#[test]
fn fire_mutates_exactly_one_cell() {
    let mut board = Board::new(6);
    board.place(CRUISER, Orientation::Horizontal, 1, 1).unwrap();
    let before = board.grid().clone();
    board.fire((3, 3)).unwrap();
    let after = board.grid();
    let mut changed = 0;
    for r in 0..6 {
        for c in 0..6 {
            if before.get((r, c)) != after.get((r, c)) {
                changed += 1;
            }
        }
    }
    assert_eq!(changed, 1);
    assert_eq!(after.get((3, 3)), Ok(Cell::Miss));
}

#[test]
fn overlapping_and_out_of_bounds_placements_rejected() {
    let mut board = Board::new(10);
    board.place(CRUISER, Orientation::Horizontal, 0, 0).unwrap();
    assert_eq!(
        board
            .place(CRUISER, Orientation::Vertical, 0, 1)
            .unwrap_err(),
        BoardError::ShipOverlaps
    );
    assert_eq!(
        board
            .place(CARRIER, Orientation::Horizontal, 9, 6)
            .unwrap_err(),
        BoardError::ShipOutOfBounds
    );
    assert_eq!(
        board
            .place(CARRIER, Orientation::Vertical, 6, 9)
            .unwrap_err(),
        BoardError::ShipOutOfBounds
    );
}

#[test]
fn random_fleet_covers_expected_cells() {
    let mut board = Board::new(10);
    let mut rng = SmallRng::seed_from_u64(42);
    let fleet = fleet_for_grid(10);
    board.place_fleet_random(&mut rng, &fleet).unwrap();

    let expected: usize = fleet.iter().map(|s| s.length()).sum();
    assert_eq!(board.grid().count(Cell::Ship), expected);
    assert_eq!(board.cells_remaining(), expected);
    assert_eq!(board.ships().len(), fleet.len());
}

#[test]
fn cell_transitions_never_reverse() {
    let mut grid = Grid::new(5);
    grid.mark((1, 1), Cell::Ship).unwrap();
    grid.mark((1, 1), Cell::Hit).unwrap();
    assert_eq!(
        grid.mark((1, 1), Cell::Ship).unwrap_err(),
        BoardError::AlreadyFired { row: 1, col: 1 }
    );
    assert_eq!(
        grid.mark((1, 1), Cell::Miss).unwrap_err(),
        BoardError::AlreadyFired { row: 1, col: 1 }
    );

    grid.mark((2, 2), Cell::Miss).unwrap();
    assert_eq!(
        grid.mark((2, 2), Cell::Hit).unwrap_err(),
        BoardError::AlreadyFired { row: 2, col: 2 }
    );

    grid.mark((3, 3), Cell::Ship).unwrap();
    assert_eq!(
        grid.mark((3, 3), Cell::Ship).unwrap_err(),
        BoardError::InvalidTransition
    );
}

#[test]
fn untried_cells_shrink_as_shots_land() {
    let mut board = Board::new(5);
    assert_eq!(board.grid().untried_cells().count(), 25);
    board.fire((0, 0)).unwrap();
    board.fire((4, 4)).unwrap();
    assert_eq!(board.grid().untried_cells().count(), 23);
    assert!(!board.grid().is_untried((0, 0)));
    assert!(board.grid().is_untried((2, 2)));
}

#[test]
fn fleet_scales_with_grid_size() {
    assert_eq!(
        fleet_for_grid(5).iter().map(|s| s.length()).collect::<Vec<_>>(),
        [3]
    );
    assert_eq!(
        fleet_for_grid(8).iter().map(|s| s.length()).collect::<Vec<_>>(),
        [4, 3]
    );
    assert_eq!(
        fleet_for_grid(10)
            .iter()
            .map(|s| s.length())
            .collect::<Vec<_>>(),
        [5, 4, 3]
    );
    assert_eq!(
        fleet_for_grid(14)
            .iter()
            .map(|s| s.length())
            .collect::<Vec<_>>(),
        [6, 5, 4, 3]
    );
    let config = GameConfig::for_grid(10);
    assert_eq!(config.total_fleet_cells(), 12);
    assert_eq!(config.think_delay_ms, 1_000);
}
