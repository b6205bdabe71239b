use super::grid::Grid;
use super::state::{Coord, Direction};
use super::tile::TileId;
use crate::events::BoardEvent;

/// What one `shift` did to the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftOutcome {
    /// True if any tile moved or merged.
    pub changed: bool,
    pub merges: u32,
}

/// Cells to visit, in order, when sliding toward `dir`.
///
/// Tiles nearest the destination edge come first so each tile can travel as
/// far as it will ever go before the tiles behind it are considered. The edge
/// line in the direction of travel is skipped: nothing there can move.
pub(crate) fn scan_order(dir: Direction, width: usize, height: usize) -> Vec<Coord> {
    let cols: Vec<usize> = match dir {
        Direction::Left => (1..width).collect(),
        Direction::Right => (0..width.saturating_sub(1)).rev().collect(),
        Direction::Up | Direction::Down => (0..width).collect(),
    };
    let rows: Vec<usize> = match dir {
        Direction::Up => (1..height).collect(),
        Direction::Down => (0..height.saturating_sub(1)).rev().collect(),
        Direction::Left | Direction::Right => (0..height).collect(),
    };
    let mut order = Vec::with_capacity(cols.len() * rows.len());
    for &x in &cols {
        for &y in &rows {
            order.push(Coord::new(x, y));
        }
    }
    order
}

/// Slide and merge every tile toward `dir` in one pass.
///
/// Moves and merges are appended to `events` in processing order. Merged-into
/// tiles come out locked; callers unlock them before the next pass.
pub fn shift(grid: &mut Grid, dir: Direction, events: &mut Vec<BoardEvent>) -> ShiftOutcome {
    let mut outcome = ShiftOutcome::default();
    for cell in scan_order(dir, grid.width(), grid.height()) {
        if let Some(id) = grid.tile_at(cell) {
            match slide_tile(grid, id, dir, events) {
                Slide::Stayed => {}
                Slide::Moved => outcome.changed = true,
                Slide::Merged => {
                    outcome.changed = true;
                    outcome.merges += 1;
                }
            }
        }
    }
    outcome
}

/// Evaluate `shift` on a copy of the board.
pub fn preview(grid: &Grid, dir: Direction) -> ShiftOutcome {
    let mut scratch = grid.clone();
    let mut sink = Vec::new();
    shift(&mut scratch, dir, &mut sink)
}

/// `[up, down, left, right]`: whether each move would change the board.
pub fn legal_moves(grid: &Grid) -> [bool; 4] {
    let mut mask = [false; 4];
    for dir in Direction::ALL {
        mask[dir.index()] = preview(grid, dir).changed;
    }
    mask
}

enum Slide {
    Stayed,
    Moved,
    Merged,
}

#[inline]
fn can_merge(grid: &Grid, moving: TileId, resting: TileId) -> bool {
    let a = grid.tile(moving);
    let b = grid.tile(resting);
    a.value() == b.value() && !b.locked()
}

fn slide_tile(grid: &mut Grid, id: TileId, dir: Direction, events: &mut Vec<BoardEvent>) -> Slide {
    let from = grid.tile(id).cell();
    let mut dest: Option<Coord> = None;
    let mut probe = grid.adjacent(from, dir);

    while let Some(cell) = probe {
        if let Some(other) = grid.tile_at(cell) {
            if can_merge(grid, id, other) {
                let value = grid.tile(other).value() * 2;
                let target = grid.merge_tile(id, cell);
                grid.set_tile_value(target, value);
                events.push(BoardEvent::Merged {
                    source: id,
                    from,
                    target,
                    at: cell,
                    value,
                });
                return Slide::Merged;
            }
            break;
        }
        dest = Some(cell);
        probe = grid.adjacent(cell, dir);
    }

    match dest {
        Some(to) => {
            grid.move_tile(id, to);
            events.push(BoardEvent::Moved { tile: id, from, to });
            Slide::Moved
        }
        None => Slide::Stayed,
    }
}
