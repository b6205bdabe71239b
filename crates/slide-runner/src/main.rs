use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use slide_runner::config::{Config, StrategyKind};
use slide_runner::pipeline::{run_games, summarize, write_results};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Play seeded sliding-tile games with an autoplay strategy"
)]
struct Cli {
    /// Path to runner TOML config (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, value_name = "N")]
    games: Option<u32>,

    /// Base RNG seed (game i uses seed + i)
    #[arg(long)]
    seed: Option<u64>,

    /// Move-selection strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Number of worker threads (defaults to Rayon default)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Write per-game results as JSON lines
    #[arg(long, value_name = "FILE")]
    results: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut cfg = match &cli.config {
        Some(path) => {
            info!("Using configuration file: {}", path.display());
            Config::from_toml(path)?
        }
        None => Config::default(),
    };
    if let Some(games) = cli.games {
        cfg.games = games;
    }
    if let Some(seed) = cli.seed {
        cfg.seed = seed;
    }
    if let Some(strategy) = cli.strategy {
        cfg.strategy = strategy;
    }
    if cli.workers.is_some() {
        cfg.workers = cli.workers;
    }
    if cli.results.is_some() {
        cfg.report.results_file = cli.results;
    }
    cfg.validate()?;

    info!(
        "Playing {} game(s) on a {}x{} board with {:?} strategy (seed {})",
        cfg.games, cfg.board.width, cfg.board.height, cfg.strategy, cfg.seed
    );
    let results = run_games(&cfg, !cli.quiet)?;
    if let Some(path) = &cfg.report.results_file {
        write_results(path, &results)?;
    }

    let summary = summarize(&results);
    info!(
        "Completed {} game(s), {} finished: mean score {:.2}, best {}, highest tile {}, {} moves",
        summary.games,
        summary.finished,
        summary.mean_score,
        summary.best_score,
        summary.highest_tile,
        summary.total_moves
    );
    Ok(())
}
