//! Typed board events for presentation and score observers.

use crate::engine::{Coord, TileId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A new tile landed in an empty cell.
    Spawned { tile: TileId, at: Coord, value: u64 },
    /// A tile slid without merging.
    Moved { tile: TileId, from: Coord, to: Coord },
    /// `source` was destroyed; `target` (still at `at`) now holds `value`.
    Merged {
        source: TileId,
        from: Coord,
        target: TileId,
        at: Coord,
        value: u64,
    },
    /// One per merge.
    ScoreIncreased { delta: u64, total: u64 },
    /// Emitted once per game.
    GameOver { score: u64 },
    /// The board was emptied for a new game.
    Cleared,
}

pub trait BoardObserver {
    fn on_event(&mut self, event: &BoardEvent);
}

impl<F: FnMut(&BoardEvent)> BoardObserver for F {
    fn on_event(&mut self, event: &BoardEvent) {
        self(event)
    }
}

/// Observer that keeps every event it sees.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<BoardEvent>,
}

impl BoardObserver for EventLog {
    fn on_event(&mut self, event: &BoardEvent) {
        self.events.push(event.clone());
    }
}
