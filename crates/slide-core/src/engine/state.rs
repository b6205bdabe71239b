use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A direction to slide/merge tiles.
///
/// Row `y = 0` is the top of the board, so `Up` steps toward smaller `y`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions in `index()` order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step `(dx, dy)` for one cell in this direction.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Stable index (0=Up, 1=Down, 2=Left, 3=Right) used by move masks.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts full names, initials and the usual `wasd` keys.
    ///
    /// ```
    /// use slide_core::Direction;
    /// assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
    /// assert_eq!("A".parse::<Direction>(), Ok(Direction::Left));
    /// assert!("sideways".parse::<Direction>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" => Ok(Direction::Up),
            "down" | "s" => Ok(Direction::Down),
            "left" | "l" | "a" => Ok(Direction::Left),
            "right" | "r" | "d" => Ok(Direction::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Integer cell coordinates within a grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Coord { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, d) in Direction::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn opposite_deltas_cancel() {
        for d in Direction::ALL {
            let (ax, ay) = d.delta();
            let (bx, by) = d.opposite().delta();
            assert_eq!((ax + bx, ay + by), (0, 0));
        }
    }

    #[test]
    fn parses_wasd_and_names() {
        assert_eq!("w".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("s".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("d".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!(" Right ".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
        let err = "x".parse::<Direction>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognised direction 'x'");
    }
}
