//! One full move cycle: shift, unlock, spawn, game-over check.

use log::debug;
use thiserror::Error;

use crate::config::{BoardConfig, ConfigError};
use crate::engine::{is_terminal, shift, Coord, Direction, Grid};
use crate::events::{BoardEvent, BoardObserver};
use crate::picker::{CellPicker, RngPicker};

/// Where the controller is in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a direction.
    Idle,
    /// A productive shift has been applied; unlock/spawn/check are pending.
    Resolving { direction: Direction, merges: u32 },
    /// No moves remain. Only `clear_board`/`new_game` leave this phase.
    Settled,
}

/// Input that cannot be accepted in the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("a move is still resolving")]
    Busy,
    #[error("the game is over")]
    GameOver,
    #[error("no move is waiting to settle")]
    NothingToSettle,
}

#[derive(Debug, Clone, Copy)]
enum Signal {
    Shifted {
        direction: Direction,
        changed: bool,
        merges: u32,
    },
    Settled {
        terminal: bool,
    },
}

impl Phase {
    fn accept_move(self) -> Result<(), RoundError> {
        match self {
            Phase::Idle => Ok(()),
            Phase::Resolving { .. } => Err(RoundError::Busy),
            Phase::Settled => Err(RoundError::GameOver),
        }
    }

    fn accept_settle(self) -> Result<(), RoundError> {
        match self {
            Phase::Resolving { .. } => Ok(()),
            Phase::Idle => Err(RoundError::NothingToSettle),
            Phase::Settled => Err(RoundError::GameOver),
        }
    }

    fn next(self, signal: Signal) -> Phase {
        match (self, signal) {
            (Phase::Idle, Signal::Shifted { changed: false, .. }) => Phase::Idle,
            (Phase::Idle, Signal::Shifted { direction, changed: true, merges }) => {
                Phase::Resolving { direction, merges }
            }
            (Phase::Resolving { .. }, Signal::Settled { terminal: true }) => Phase::Settled,
            (Phase::Resolving { .. }, Signal::Settled { terminal: false }) => Phase::Idle,
            (phase, signal) => unreachable!("{signal:?} delivered in phase {phase:?}"),
        }
    }
}

/// Result of a move request (or of the settle half of one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub direction: Direction,
    /// True if any tile moved or merged.
    pub changed: bool,
    pub merges: u32,
    pub score_delta: u64,
    pub spawned: Option<Coord>,
    pub game_over: bool,
    pub events: Vec<BoardEvent>,
}

impl RoundReport {
    fn absorb(&mut self, settled: RoundReport) {
        self.spawned = settled.spawned;
        self.game_over = settled.game_over;
        self.events.extend(settled.events);
    }
}

/// Drives a board through rounds. One direction is fully resolved before
/// the next is accepted.
pub struct RoundController<P = RngPicker> {
    config: BoardConfig,
    grid: Grid,
    picker: P,
    phase: Phase,
    score: u64,
    moves: u64,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl RoundController<RngPicker> {
    /// Controller with a seeded uniform spawn picker and an empty board.
    pub fn seeded(config: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, RngPicker::seeded(seed))
    }
}

impl<P: CellPicker> RoundController<P> {
    /// Controller with an empty board; call [`new_game`](Self::new_game) to
    /// place the starting tiles.
    pub fn new(config: BoardConfig, picker: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        Ok(Self {
            config,
            grid,
            picker,
            phase: Phase::Idle,
            score: 0,
            moves: 0,
            observers: Vec::new(),
        })
    }

    /// Start from an existing board, e.g. a hand-built position.
    ///
    /// Panics if `grid` does not match the configured dimensions.
    pub fn with_grid(config: BoardConfig, grid: Grid, picker: P) -> Result<Self, ConfigError> {
        let mut rc = Self::new(config, picker)?;
        assert_eq!(
            (grid.width(), grid.height()),
            (rc.config.width, rc.config.height),
            "grid does not match configured dimensions"
        );
        rc.grid = grid;
        rc.grid.unlock_all();
        if is_terminal(&rc.grid) {
            rc.phase = Phase::Settled;
        }
        Ok(rc)
    }

    /// Register an observer. Subscribing to a game that is already over
    /// delivers its `GameOver` to the new observer immediately.
    pub fn subscribe<O: BoardObserver + 'static>(&mut self, mut observer: O) {
        if self.is_game_over() {
            observer.on_event(&BoardEvent::GameOver { score: self.score });
        }
        self.observers.push(Box::new(observer));
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Number of productive rounds played since the last reset.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Settled
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }

    /// Empty the board for a new game.
    pub fn clear_board(&mut self) {
        self.grid.clear();
        self.score = 0;
        self.moves = 0;
        self.phase = Phase::Idle;
        self.publish(&[BoardEvent::Cleared]);
    }

    /// Clear the board and place the configured starting tiles.
    pub fn new_game(&mut self) -> Vec<BoardEvent> {
        self.clear_board();
        let mut events = Vec::with_capacity(self.config.starting_tiles + 1);
        for _ in 0..self.config.starting_tiles {
            self.spawn_random(&mut events);
        }
        // Only reachable when the starting tiles fill the board.
        if is_terminal(&self.grid) {
            self.finish(&mut events);
        }
        self.publish(&events);
        events
    }

    /// Apply `direction` and, if anything changed, settle the round at once.
    pub fn submit_move(&mut self, direction: Direction) -> Result<RoundReport, RoundError> {
        let mut report = self.begin_move(direction)?;
        if report.changed {
            let settled = self.settle()?;
            report.absorb(settled);
        }
        Ok(report)
    }

    /// First half of a round: slide and merge.
    ///
    /// An unproductive move leaves the controller `Idle` with nothing else
    /// done. A productive one leaves it `Resolving` until [`settle`](Self::settle).
    pub fn begin_move(&mut self, direction: Direction) -> Result<RoundReport, RoundError> {
        self.phase.accept_move()?;

        let mut shifted = Vec::new();
        let outcome = shift(&mut self.grid, direction, &mut shifted);

        let mut events = Vec::with_capacity(shifted.len() + outcome.merges as usize);
        let mut score_delta = 0;
        for event in shifted {
            let merged = matches!(event, BoardEvent::Merged { .. });
            events.push(event);
            if merged {
                self.score += self.config.score_per_merge;
                score_delta += self.config.score_per_merge;
                events.push(BoardEvent::ScoreIncreased {
                    delta: self.config.score_per_merge,
                    total: self.score,
                });
            }
        }

        self.phase = self.phase.next(Signal::Shifted {
            direction,
            changed: outcome.changed,
            merges: outcome.merges,
        });
        debug!(
            "move {direction}: changed={} merges={} score={}",
            outcome.changed, outcome.merges, self.score
        );
        self.publish(&events);

        Ok(RoundReport {
            direction,
            changed: outcome.changed,
            merges: outcome.merges,
            score_delta,
            spawned: None,
            game_over: false,
            events,
        })
    }

    /// Second half of a round: unlock every tile, spawn into a free cell,
    /// then check for game over. Unlocking precedes the check and the spawn
    /// precedes it too, since a freshly filled board may be terminal.
    pub fn settle(&mut self) -> Result<RoundReport, RoundError> {
        self.phase.accept_settle()?;
        let Phase::Resolving { direction, merges } = self.phase else {
            unreachable!("accept_settle admits only Resolving");
        };

        self.grid.unlock_all();

        let mut events = Vec::with_capacity(2);
        let spawned = if self.grid.is_full() {
            None
        } else {
            self.spawn_random(&mut events)
        };
        self.moves += 1;

        let terminal = is_terminal(&self.grid);
        self.phase = self.phase.next(Signal::Settled { terminal });
        if terminal {
            self.finish(&mut events);
        }
        self.publish(&events);

        Ok(RoundReport {
            direction,
            changed: true,
            merges,
            score_delta: 0,
            spawned,
            game_over: terminal,
            events,
        })
    }

    fn spawn_random(&mut self, events: &mut Vec<BoardEvent>) -> Option<Coord> {
        let at = self.grid.random_empty_cell(&mut self.picker)?;
        let value = self.config.spawn_value;
        let tile = self.grid.spawn_tile(at, value);
        events.push(BoardEvent::Spawned { tile, at, value });
        Some(at)
    }

    fn finish(&mut self, events: &mut Vec<BoardEvent>) {
        self.phase = Phase::Settled;
        debug!(
            "game over after {} moves: score={} highest={}",
            self.moves,
            self.score,
            self.grid.highest_tile()
        );
        events.push(BoardEvent::GameOver { score: self.score });
    }

    fn publish(&mut self, events: &[BoardEvent]) {
        for observer in self.observers.iter_mut() {
            for event in events {
                observer.on_event(event);
            }
        }
    }
}
