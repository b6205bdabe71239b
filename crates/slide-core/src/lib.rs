//! Sliding-tile merge engine for 2048-style puzzles.
//!
//! ```
//! use slide_core::{BoardConfig, Direction, RoundController};
//!
//! let mut game = RoundController::seeded(BoardConfig::default(), 42).unwrap();
//! game.new_game();
//! assert_eq!(game.grid().occupied_count(), 2);
//! let report = game.submit_move(Direction::Left).unwrap();
//! if report.changed {
//!     assert!(report.spawned.is_some());
//! }
//! ```
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod events;
pub mod picker;
pub mod round;

pub use config::{BoardConfig, ConfigError, MAX_CELLS};
pub use engine::{
    is_terminal, is_tile_value, legal_moves, preview, shift, Coord, Direction, Grid,
    ParseDirectionError, ShiftOutcome, Tile, TileId,
};
pub use events::{BoardEvent, BoardObserver, EventLog};
pub use picker::{CellPicker, FirstEmptyPicker, RngPicker, ScriptedPicker};
pub use round::{Phase, RoundController, RoundError, RoundReport};
