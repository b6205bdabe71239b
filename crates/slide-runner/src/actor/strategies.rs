use rand::seq::SliceRandom;
use rand::Rng;
use slide_core::{preview, Direction, Grid};

use crate::config::StrategyKind;

/// Tie-break order shared by the deterministic strategies.
pub(crate) const PREFERENCE: [Direction; 4] =
    [Direction::Up, Direction::Left, Direction::Right, Direction::Down];

pub(crate) fn select_move<R: Rng + ?Sized>(
    kind: StrategyKind,
    grid: &Grid,
    legal: &[bool; 4],
    rng: &mut R,
) -> Option<Direction> {
    match kind {
        StrategyKind::Random => select_random(legal, rng),
        StrategyKind::Cycle => select_first_legal(legal),
        StrategyKind::Greedy => select_most_merges(grid, legal),
    }
}

fn select_random<R: Rng + ?Sized>(legal: &[bool; 4], rng: &mut R) -> Option<Direction> {
    let options: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| legal[d.index()])
        .collect();
    options.choose(rng).copied()
}

fn select_first_legal(legal: &[bool; 4]) -> Option<Direction> {
    PREFERENCE.into_iter().find(|d| legal[d.index()])
}

fn select_most_merges(grid: &Grid, legal: &[bool; 4]) -> Option<Direction> {
    let mut best: Option<(Direction, u32)> = None;
    for dir in PREFERENCE {
        if !legal[dir.index()] {
            continue;
        }
        let merges = preview(grid, dir).merges;
        if best.map_or(true, |(_, m)| merges > m) {
            best = Some((dir, merges));
        }
    }
    best.map(|(d, _)| d)
}
