use super::grid::Grid;
use super::state::Direction;

/// True when the board is full and no two orthogonal neighbours share a value.
///
/// Lock flags are ignored; they only carry meaning inside a single move.
///
/// ```
/// use slide_core::{Grid, is_terminal};
/// // 2 4
/// // 4 2
/// assert!(is_terminal(&Grid::from_values(2, 2, &[2, 4, 4, 2])));
/// assert!(!is_terminal(&Grid::from_values(4, 1, &[2, 4, 4, 2])));
/// assert!(!is_terminal(&Grid::from_values(2, 2, &[2, 0, 4, 8])));
/// ```
pub fn is_terminal(grid: &Grid) -> bool {
    if !grid.is_full() {
        return false;
    }
    !grid.tiles().any(|(_, tile)| {
        Direction::ALL.iter().any(|&dir| {
            grid.adjacent(tile.cell(), dir)
                .and_then(|c| grid.value_at(c))
                .is_some_and(|v| v == tile.value())
        })
    })
}
