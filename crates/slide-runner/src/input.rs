//! Line-oriented input adapter for the terminal player.

use slide_core::{Direction, ParseDirectionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Moves(Vec<Direction>),
    NewGame,
    Help,
    Quit,
}

/// Parse one line: a keyword, a direction name, or a run of `wasd` keys
/// (`"aaw"` is left, left, up). Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Command, ParseDirectionError>> {
    let word = line.trim().to_ascii_lowercase();
    if word.is_empty() {
        return None;
    }
    let cmd = match word.as_str() {
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "n" | "new" => Ok(Command::NewGame),
        "h" | "help" | "?" => Ok(Command::Help),
        _ => match word.parse::<Direction>() {
            Ok(dir) => Ok(Command::Moves(vec![dir])),
            Err(whole) => word
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_string().parse::<Direction>())
                .collect::<Result<Vec<_>, _>>()
                .map(Command::Moves)
                .map_err(|_| whole),
        },
    };
    Some(cmd)
}

pub const HELP: &str = "\
w/a/s/d or up/left/down/right: move (several keys per line are fine)
n: new game    h: help    q: quit";
