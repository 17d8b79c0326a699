//! Terminal board rendering and coordinate parsing.

use crate::board::Board;
use crate::common::Coord;
use crate::grid::{Cell, Grid};

/// Parse "B4"-style input into a coordinate (column letter, 1-based row).
/// No bounds check; the firing path validates against the grid.
pub fn parse_coord(input: &str) -> Option<Coord> {
    if input.len() < 2 {
        return None;
    }
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize;
    let row_str: String = chars.collect();
    let row: usize = row_str.trim().parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}

/// Render a coordinate the way players type it, e.g. `C5`.
pub fn coord_label(coord: Coord) -> String {
    let col = (b'A' + coord.1 as u8) as char;
    format!("{}{}", col, coord.0 + 1)
}

fn glyph(cell: Cell, reveal: bool) -> char {
    match cell {
        Cell::Hit => 'X',
        Cell::Miss => 'o',
        Cell::Ship if reveal => 'S',
        _ => '.',
    }
}

/// Render a grid with a column-letter header and 1-based row numbers.
/// `reveal` controls whether untouched ship cells are shown.
pub fn render_grid(grid: &Grid, reveal: bool) -> String {
    let mut out = String::from("   ");
    for c in 0..grid.size() {
        out.push(' ');
        out.push((b'A' + c as u8) as char);
    }
    out.push('\n');
    for r in 0..grid.size() {
        out.push_str(&format!("{:2} ", r + 1));
        for c in 0..grid.size() {
            out.push(' ');
            out.push(glyph(grid.get((r, c)).unwrap_or(Cell::Empty), reveal));
        }
        out.push('\n');
    }
    out
}

/// Render a fleet board with its ships visible.
pub fn render_board(board: &Board) -> String {
    render_grid(board.grid(), true)
}
