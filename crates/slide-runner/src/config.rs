use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use slide_core::BoardConfig;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Uniform over the legal moves
    #[default]
    Random,
    /// First legal move in a fixed up/left/right/down preference
    Cycle,
    /// Legal move with the most merges, ties broken by preference order
    Greedy,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default = "defaults::games")]
    pub games: u32,

    /// Base seed; game `i` plays with `seed + i`.
    #[serde(default = "defaults::seed")]
    pub seed: u64,

    /// Stop a game after this many productive moves even if it is not over.
    #[serde(default)]
    pub max_steps: Option<u64>,

    /// Worker threads (defaults to Rayon default)
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default)]
    pub strategy: StrategyKind,

    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub report: Report,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Report {
    /// JSON-lines file receiving one result per game.
    #[serde(default)]
    pub results_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            seed: defaults::seed(),
            max_steps: None,
            workers: None,
            strategy: StrategyKind::default(),
            board: BoardConfig::default(),
            report: Report::default(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            bail!("games must be at least 1");
        }
        if self.workers == Some(0) {
            bail!("workers must be at least 1 when set");
        }
        self.board.validate().context("invalid [board] section")?;
        Ok(())
    }
}

mod defaults {
    pub fn games() -> u32 { 16 }
    pub fn seed() -> u64 { 12345 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_nested_board_section() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
games = 4
seed = 7
strategy = "greedy"
max_steps = 500

[board]
width = 5
height = 3

[report]
results_file = "out/results.jsonl"
"#
        )
        .unwrap();
        let cfg = Config::from_toml(f.path()).unwrap();
        assert_eq!(cfg.games, 4);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.strategy, StrategyKind::Greedy);
        assert_eq!(cfg.max_steps, Some(500));
        assert_eq!(cfg.board.width, 5);
        assert_eq!(cfg.board.height, 3);
        assert_eq!(cfg.board.spawn_value, 2);
        assert_eq!(
            cfg.report.results_file.as_deref(),
            Some(Path::new("out/results.jsonl"))
        );
        cfg.validate().unwrap();
    }

    #[test]
    fn defaults_are_valid() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_invalid_board() {
        let cfg: Config = toml::from_str("[board]\nwidth = 0").unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:#}").contains("board dimensions must be non-zero"));
    }

    #[test]
    fn unknown_strategy_fails_to_parse() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "strategy = \"telepathy\"").unwrap();
        assert!(Config::from_toml(f.path()).is_err());
    }
}
