//! Engine module: the board arena, tile lifecycle, single-pass slide/merge
//! and game-over detection. Public API stays small and ergonomic.
//!
//! - `Grid` owns the cells and, through its arena, every live `Tile`.
//! - Free functions (`shift`, `preview`, `legal_moves`, `is_terminal`) operate
//!   on a `Grid` and never spawn tiles; spawning is the round's job.

mod grid;
mod ops;
pub mod state;
mod termination;
mod tile;

pub use grid::Grid;
pub use ops::{legal_moves, preview, shift, ShiftOutcome};
pub use state::{Coord, Direction, ParseDirectionError};
pub use termination::is_terminal;
pub use tile::{is_tile_value, Tile, TileId};
