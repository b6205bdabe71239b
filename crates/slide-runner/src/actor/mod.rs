use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slide_core::{legal_moves, BoardConfig, ConfigError, RoundController, RoundError};

use crate::config::StrategyKind;

pub mod strategies;

/// Keeps the strategy's random stream independent of the spawn stream.
const STRATEGY_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-game actor that drives a single board to completion by asking a
/// strategy for moves and submitting them to the round controller.
pub struct GameActor {
    pub game_id: u32,
    pub seed: u64,
    pub strategy: StrategyKind,
    pub max_steps: Option<u64>,
    controller: RoundController,
    rng: StdRng,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GameResult {
    pub game_id: u32,
    pub seed: u64,
    pub moves: u64,
    pub score: u64,
    pub highest_tile: u64,
    pub tile_sum: u64,
    /// False if the game stopped at `max_steps` or ran out of strategy moves.
    pub game_over: bool,
}

impl GameActor {
    pub fn new(
        game_id: u32,
        seed: u64,
        board: BoardConfig,
        strategy: StrategyKind,
        max_steps: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let mut controller = RoundController::seeded(board, seed)?;
        controller.new_game();
        Ok(Self {
            game_id,
            seed,
            strategy,
            max_steps,
            controller,
            rng: StdRng::seed_from_u64(seed ^ STRATEGY_SEED_SALT),
        })
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    /// Run the actor loop to completion and return the result.
    pub fn run(mut self) -> GameResult {
        while !self.controller.is_game_over() {
            if self.max_steps.is_some_and(|max| self.controller.moves() >= max) {
                warn!(
                    "game {} stopped at step limit {} (score {})",
                    self.game_id,
                    self.controller.moves(),
                    self.controller.score()
                );
                break;
            }
            let grid = self.controller.grid();
            let legal = legal_moves(grid);
            let Some(dir) = strategies::select_move(self.strategy, grid, &legal, &mut self.rng)
            else {
                break;
            };
            match self.controller.submit_move(dir) {
                Ok(_) => {}
                Err(RoundError::GameOver) => break,
                Err(e) => {
                    warn!("game {}: {e}", self.game_id);
                    break;
                }
            }
        }

        let grid = self.controller.grid();
        let result = GameResult {
            game_id: self.game_id,
            seed: self.seed,
            moves: self.controller.moves(),
            score: self.controller.score(),
            highest_tile: grid.highest_tile(),
            tile_sum: grid.tile_sum(),
            game_over: self.controller.is_game_over(),
        };
        debug!("game {} finished: {:?}", self.game_id, result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_result() {
        for strategy in [StrategyKind::Random, StrategyKind::Cycle, StrategyKind::Greedy] {
            let a = GameActor::new(0, 99, BoardConfig::default(), strategy, None).unwrap();
            let b = GameActor::new(0, 99, BoardConfig::default(), strategy, None).unwrap();
            assert_eq!(a.run(), b.run());
        }
    }

    #[test]
    fn unlimited_game_runs_to_game_over() {
        let config = BoardConfig {
            width: 3,
            height: 3,
            ..BoardConfig::default()
        };
        let result = GameActor::new(1, 5, config, StrategyKind::Greedy, None)
            .unwrap()
            .run();
        assert!(result.game_over);
        assert!(result.moves > 0);
        // Every productive move spawns one 2 on top of the two starting tiles.
        assert_eq!(result.tile_sum, 2 * (result.moves + 2));
    }

    #[test]
    fn step_limit_stops_early() {
        let result = GameActor::new(2, 5, BoardConfig::default(), StrategyKind::Cycle, Some(3))
            .unwrap()
            .run();
        assert_eq!(result.moves, 3);
        assert!(!result.game_over);
    }
}
