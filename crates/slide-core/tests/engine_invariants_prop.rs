//! Property tests for the slide/merge kernel and the round cycle.
//!
//! Invariants covered:
//! - An unproductive shift leaves the board exactly as it was.
//! - Shifting conserves the tile value sum and never breaks cell <-> tile links.
//! - Each merge removes exactly one tile; locks only exist mid-round.
//! - Occupancy never exceeds capacity over generated games.
//! - Game over holds iff the board is full and no legal move remains.

use proptest::prelude::*;
use slide_core::{
    is_terminal, legal_moves, shift, BoardConfig, Direction, Grid, RoundController, RoundError,
};

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

/// Boards up to 5x5 with cells empty or holding 2..=64.
fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..=5, 1usize..=5).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop_oneof![Just(0u64), (1u32..=6).prop_map(|k| 1u64 << k)], w * h)
            .prop_map(move |values| Grid::from_values(w, h, &values))
    })
}

proptest! {
    #[test]
    fn unchanged_shift_is_identity(grid in arb_grid(), dir in arb_direction()) {
        let mut g = grid.clone();
        let before = g.values();
        let mut events = Vec::new();
        let out = shift(&mut g, dir, &mut events);
        if !out.changed {
            prop_assert_eq!(g.values(), before);
            prop_assert!(events.is_empty());
            prop_assert!(g.tiles().all(|(_, t)| !t.locked()));
        }
    }

    #[test]
    fn shift_conserves_sum_and_links(grid in arb_grid(), dir in arb_direction()) {
        let mut g = grid.clone();
        let sum = g.tile_sum();
        let count = g.occupied_count();
        let out = shift(&mut g, dir, &mut Vec::new());
        prop_assert_eq!(g.tile_sum(), sum);
        prop_assert_eq!(g.occupied_count() + out.merges as usize, count);
        prop_assert!(g.is_consistent());
        let locked = g.tiles().filter(|(_, t)| t.locked()).count();
        prop_assert_eq!(locked, out.merges as usize);
    }

    #[test]
    fn second_shift_after_settling_matches_legal_mask(grid in arb_grid(), dir in arb_direction()) {
        let mask = legal_moves(&grid);
        let mut g = grid.clone();
        let out = shift(&mut g, dir, &mut Vec::new());
        prop_assert_eq!(mask[dir.index()], out.changed);
    }

    #[test]
    fn generated_games_respect_round_invariants(
        seed in any::<u64>(),
        width in 2usize..=5,
        height in 2usize..=5,
        moves in prop::collection::vec(arb_direction(), 1..120),
    ) {
        let config = BoardConfig { width, height, ..BoardConfig::default() };
        let mut rc = RoundController::seeded(config, seed).unwrap();
        rc.new_game();

        for dir in moves {
            let before_sum = rc.grid().tile_sum();
            let before_score = rc.score();
            match rc.submit_move(dir) {
                Ok(report) => {
                    let g = rc.grid();
                    prop_assert!(g.occupied_count() <= g.capacity());
                    prop_assert!(g.is_consistent());
                    prop_assert!(g.tiles().all(|(_, t)| !t.locked()));
                    prop_assert_eq!(rc.score(), before_score + u64::from(report.merges));
                    let spawned_value = if report.spawned.is_some() { 2 } else { 0 };
                    prop_assert_eq!(g.tile_sum(), before_sum + spawned_value);
                    prop_assert_eq!(report.spawned.is_some(), report.changed);
                    prop_assert_eq!(report.game_over, is_terminal(g));
                    if report.game_over {
                        prop_assert!(g.is_full());
                        prop_assert_eq!(legal_moves(g), [false; 4]);
                    }
                }
                Err(RoundError::GameOver) => {
                    prop_assert!(rc.is_game_over());
                    break;
                }
                Err(other) => prop_assert!(false, "unexpected {}", other),
            }
        }
    }
}
