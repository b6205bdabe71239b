use std::path::Path;

use thiserror::Error;

use crate::engine::is_tile_value;

/// Largest board `validate` accepts, in cells.
pub const MAX_CELLS: usize = 1 << 16;

/// Board shape and round rules.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct BoardConfig {
    #[serde(default = "defaults::width")]
    pub width: usize,
    #[serde(default = "defaults::height")]
    pub height: usize,

    /// Value of every spawned tile.
    #[serde(default = "defaults::spawn_value")]
    pub spawn_value: u64,

    /// Tiles placed by `new_game`.
    #[serde(default = "defaults::starting_tiles")]
    pub starting_tiles: usize,

    /// Score added per merge, independent of the merged value.
    #[serde(default = "defaults::score_per_merge")]
    pub score_per_merge: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("board dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },
    #[error("a {width}x{height} board exceeds {} cells", MAX_CELLS)]
    TooLarge { width: usize, height: usize },
    #[error("spawn value {0} is not a power of two >= 2")]
    SpawnValue(u64),
    #[error("{starting} starting tiles do not fit on a board of {capacity} cells")]
    TooManyStartingTiles { starting: usize, capacity: usize },
    #[error("score_per_merge must be at least 1")]
    ZeroScore,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: defaults::width(),
            height: defaults::height(),
            spawn_value: defaults::spawn_value(),
            starting_tiles: defaults::starting_tiles(),
            score_per_merge: defaults::score_per_merge(),
        }
    }
}

impl BoardConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        let capacity = self
            .width
            .checked_mul(self.height)
            .filter(|&cells| cells <= MAX_CELLS)
            .ok_or(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
            })?;
        if !is_tile_value(self.spawn_value) {
            return Err(ConfigError::SpawnValue(self.spawn_value));
        }
        if self.starting_tiles > capacity {
            return Err(ConfigError::TooManyStartingTiles {
                starting: self.starting_tiles,
                capacity,
            });
        }
        if self.score_per_merge == 0 {
            return Err(ConfigError::ZeroScore);
        }
        Ok(())
    }

    /// Cell count, saturating for shapes `validate` would reject.
    pub fn capacity(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

mod defaults {
    pub fn width() -> usize { 4 }
    pub fn height() -> usize { 4 }
    pub fn spawn_value() -> u64 { 2 }
    pub fn starting_tiles() -> usize { 2 }
    pub fn score_per_merge() -> u64 { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: BoardConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, BoardConfig::default());
        assert_eq!(cfg.capacity(), 16);
        cfg.validate().unwrap();
    }

    #[test]
    fn loads_partial_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "width = 5\nstarting_tiles = 3").unwrap();
        let cfg = BoardConfig::from_toml(f.path()).unwrap();
        assert_eq!(cfg.width, 5);
        assert_eq!(cfg.height, 4);
        assert_eq!(cfg.starting_tiles, 3);
        assert_eq!(cfg.score_per_merge, 1);
    }

    #[test]
    fn rejects_bad_values() {
        let zero = BoardConfig { width: 0, ..BoardConfig::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroDimension { .. })));

        let odd = BoardConfig { spawn_value: 3, ..BoardConfig::default() };
        assert!(matches!(odd.validate(), Err(ConfigError::SpawnValue(3))));

        let crowded = BoardConfig { width: 1, height: 1, ..BoardConfig::default() };
        assert!(matches!(
            crowded.validate(),
            Err(ConfigError::TooManyStartingTiles { starting: 2, capacity: 1 })
        ));

        let free = BoardConfig { score_per_merge: 0, ..BoardConfig::default() };
        assert!(matches!(free.validate(), Err(ConfigError::ZeroScore)));
    }

    #[test]
    fn rejects_oversized_boards_without_overflow() {
        let wrapping = BoardConfig { width: usize::MAX, height: 2, ..BoardConfig::default() };
        assert!(matches!(
            wrapping.validate(),
            Err(ConfigError::TooLarge { width: usize::MAX, height: 2 })
        ));
        assert_eq!(wrapping.capacity(), usize::MAX);

        let huge = BoardConfig { width: 1 << 9, height: 1 << 9, ..BoardConfig::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::TooLarge { .. })));

        let widest = BoardConfig { width: MAX_CELLS, height: 1, ..BoardConfig::default() };
        widest.validate().unwrap();
    }

    #[test]
    fn oversized_board_in_file_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "width = {}\nheight = 3", i64::MAX).unwrap();
        let err = BoardConfig::from_toml(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { height: 3, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let td = tempfile::tempdir().unwrap();
        let err = BoardConfig::from_toml(td.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn invalid_file_is_rejected_on_load() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "spawn_value = 6").unwrap();
        let err = BoardConfig::from_toml(f.path()).unwrap_err();
        assert_eq!(err.to_string(), "spawn value 6 is not a power of two >= 2");
    }
}
