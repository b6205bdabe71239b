//! Sources for choosing which empty cell receives a spawned tile.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses one of `candidates` options by index.
///
/// Implementations must return a value in `0..candidates`; `candidates` is
/// never zero.
pub trait CellPicker {
    fn pick(&mut self, candidates: usize) -> usize;
}

impl<P: CellPicker + ?Sized> CellPicker for &mut P {
    fn pick(&mut self, candidates: usize) -> usize {
        (**self).pick(candidates)
    }
}

impl<P: CellPicker + ?Sized> CellPicker for Box<P> {
    fn pick(&mut self, candidates: usize) -> usize {
        (**self).pick(candidates)
    }
}

/// Uniform choice backed by any `rand` generator.
///
/// ```
/// use slide_core::{CellPicker, RngPicker};
/// let mut a = RngPicker::seeded(7);
/// let mut b = RngPicker::seeded(7);
/// let xs: Vec<usize> = (0..8).map(|_| a.pick(16)).collect();
/// let ys: Vec<usize> = (0..8).map(|_| b.pick(16)).collect();
/// assert_eq!(xs, ys);
/// ```
#[derive(Debug, Clone)]
pub struct RngPicker<R = StdRng> {
    rng: R,
}

impl RngPicker<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> RngPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> CellPicker for RngPicker<R> {
    #[inline]
    fn pick(&mut self, candidates: usize) -> usize {
        self.rng.gen_range(0..candidates)
    }
}

/// Always picks the first candidate (row-major order).
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEmptyPicker;

impl CellPicker for FirstEmptyPicker {
    fn pick(&mut self, _candidates: usize) -> usize {
        0
    }
}

/// Replays a fixed sequence of indices, reduced modulo the candidate count.
/// Falls back to the first candidate once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    script: VecDeque<usize>,
}

impl ScriptedPicker {
    pub fn new<I: IntoIterator<Item = usize>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl CellPicker for ScriptedPicker {
    fn pick(&mut self, candidates: usize) -> usize {
        self.script.pop_front().map_or(0, |i| i % candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_picker_stays_in_range() {
        let mut p = RngPicker::seeded(99);
        for n in 1..40 {
            assert!(p.pick(n) < n);
        }
    }

    #[test]
    fn scripted_picker_wraps_and_falls_back() {
        let mut p = ScriptedPicker::new([5, 1]);
        assert_eq!(p.pick(3), 2);
        assert_eq!(p.pick(3), 1);
        assert_eq!(p.remaining(), 0);
        assert_eq!(p.pick(3), 0);
    }

    #[test]
    fn boxed_picker_delegates() {
        let mut p: Box<dyn CellPicker> = Box::new(ScriptedPicker::new([4]));
        assert_eq!(p.pick(10), 4);
    }
}
