use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::actor::{GameActor, GameResult};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub games: usize,
    pub finished: usize,
    pub mean_score: f64,
    pub best_score: u64,
    pub highest_tile: u64,
    pub total_moves: u64,
}

/// Play `cfg.games` seeded games in parallel. Results come back ordered by game id.
pub fn run_games(cfg: &Config, progress: bool) -> Result<Vec<GameResult>> {
    let pb = if progress {
        let pb = ProgressBar::new(u64::from(cfg.games));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
            )
            .context("invalid progress template")?
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let play = || -> Result<Vec<GameResult>> {
        (0..cfg.games)
            .into_par_iter()
            .map(|game_id| {
                let seed = cfg.seed.wrapping_add(u64::from(game_id));
                let actor = GameActor::new(
                    game_id,
                    seed,
                    cfg.board.clone(),
                    cfg.strategy,
                    cfg.max_steps,
                )
                .with_context(|| format!("failed to set up game {game_id}"))?;
                let result = actor.run();
                pb.inc(1);
                Ok(result)
            })
            .collect()
    };

    let mut results = if let Some(n) = cfg.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("failed to build rayon thread pool")?
            .install(play)?
    } else {
        play()?
    };
    pb.finish_with_message("games played");

    results.sort_by_key(|r| r.game_id);
    Ok(results)
}

/// Write one JSON object per line.
pub fn write_results(path: &Path, results: &[GameResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for r in results {
        serde_json::to_writer(&mut out, r)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}

pub fn summarize(results: &[GameResult]) -> RunSummary {
    let games = results.len();
    let total_score: u64 = results.iter().map(|r| r.score).sum();
    RunSummary {
        games,
        finished: results.iter().filter(|r| r.game_over).count(),
        mean_score: if games == 0 {
            0.0
        } else {
            total_score as f64 / games as f64
        },
        best_score: results.iter().map(|r| r.score).max().unwrap_or(0),
        highest_tile: results.iter().map(|r| r.highest_tile).max().unwrap_or(0),
        total_moves: results.iter().map(|r| r.moves).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyKind;

    fn small_config() -> Config {
        Config {
            games: 6,
            seed: 4242,
            workers: Some(2),
            strategy: StrategyKind::Cycle,
            ..Config::default()
        }
    }

    #[test]
    fn results_are_ordered_and_reproducible() {
        let cfg = small_config();
        let a = run_games(&cfg, false).unwrap();
        let b = run_games(&cfg, false).unwrap();
        assert_eq!(a, b);
        let ids: Vec<u32> = a.iter().map(|r| r.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(a[3].seed, 4245);
    }

    #[test]
    fn writes_json_lines() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("nested").join("results.jsonl");
        let results = run_games(&small_config(), false).unwrap();
        write_results(&path, &results).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), results.len());
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["game_id"], 0);
        assert_eq!(first["seed"], 4242);
    }

    #[test]
    fn summary_aggregates() {
        let mk = |game_id, score, highest_tile, game_over| GameResult {
            game_id,
            seed: 0,
            moves: 10,
            score,
            highest_tile,
            tile_sum: 0,
            game_over,
        };
        let s = summarize(&[mk(0, 10, 64, true), mk(1, 30, 128, false)]);
        assert_eq!(s.games, 2);
        assert_eq!(s.finished, 1);
        assert_eq!(s.mean_score, 20.0);
        assert_eq!(s.best_score, 30);
        assert_eq!(s.highest_tile, 128);
        assert_eq!(s.total_moves, 20);
        assert_eq!(summarize(&[]).mean_score, 0.0);
    }
}
