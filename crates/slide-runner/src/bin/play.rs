use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::debug;
use slide_core::{BoardConfig, BoardEvent, CellPicker, RngPicker, RoundController, RoundError};
use slide_runner::input::{parse_line, Command, HELP};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a sliding-tile game in the terminal")]
struct Args {
    /// Board TOML config (width, height, spawn_value, starting_tiles, score_per_merge)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed for tile spawns; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn render<P: CellPicker>(game: &RoundController<P>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", game.grid())?;
    writeln!(out, "score: {}  moves: {}", game.score(), game.moves())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let board = match &args.config {
        Some(path) => BoardConfig::from_toml(path)
            .with_context(|| format!("failed to load board config {}", path.display()))?,
        None => BoardConfig::default(),
    };
    let picker = match args.seed {
        Some(seed) => RngPicker::seeded(seed),
        None => RngPicker::from_entropy(),
    };
    let mut game = RoundController::new(board, picker)?;
    game.subscribe(|e: &BoardEvent| debug!("{e:?}"));
    game.new_game();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{HELP}")?;
    render(&game, &mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        let Some(parsed) = parse_line(&line) else {
            continue;
        };
        match parsed {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(out, "{HELP}")?,
            Ok(Command::NewGame) => {
                game.new_game();
                render(&game, &mut out)?;
            }
            Ok(Command::Moves(dirs)) => {
                for dir in dirs {
                    match game.submit_move(dir) {
                        Ok(report) if !report.changed => writeln!(out, "{dir}: nothing moved")?,
                        Ok(report) if report.game_over => {
                            render(&game, &mut out)?;
                            writeln!(
                                out,
                                "game over, final score {}; 'n' starts a new game",
                                game.score()
                            )?;
                            break;
                        }
                        Ok(_) => {}
                        Err(RoundError::GameOver) => {
                            writeln!(out, "the game is over; 'n' starts a new game")?;
                            break;
                        }
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
                if !game.is_game_over() {
                    render(&game, &mut out)?;
                }
            }
            Err(e) => writeln!(out, "{e}; 'h' for help")?,
        }
    }
    Ok(())
}
