use std::fmt;

use super::state::{Coord, Direction};
use super::tile::{Tile, TileArena, TileId};
use crate::picker::CellPicker;

/// Fixed-size board of cells. Cells are stored row-major; each holds the id
/// of the tile occupying it, and the tile arena owns the tiles themselves.
///
/// Out-of-bounds coordinates are caller bugs and panic.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    pub(crate) cells: Vec<Option<TileId>>,
    pub(crate) tiles: TileArena,
}

impl Grid {
    /// Create an empty `width` x `height` grid. Both dimensions must be non-zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        let capacity = width * height;
        Self {
            width,
            height,
            cells: vec![None; capacity],
            tiles: TileArena::with_capacity(capacity),
        }
    }

    /// Build a grid from row-major values, `0` meaning empty.
    ///
    /// ```
    /// use slide_core::{Coord, Grid};
    /// let g = Grid::from_values(2, 2, &[2, 0, 0, 4]);
    /// assert_eq!(g.occupied_count(), 2);
    /// assert_eq!(g.value_at(Coord::new(1, 1)), Some(4));
    /// ```
    pub fn from_values(width: usize, height: usize, values: &[u64]) -> Self {
        assert_eq!(
            values.len(),
            width * height,
            "expected {} values for a {width}x{height} grid",
            width * height
        );
        let mut grid = Grid::new(width, height);
        for (idx, &v) in values.iter().enumerate() {
            if v != 0 {
                grid.spawn_tile(Coord::new(idx % width, idx / width), v);
            }
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied_count() == self.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x < self.width && c.y < self.height
    }

    #[inline]
    pub(crate) fn index_of(&self, c: Coord) -> usize {
        assert!(
            self.contains(c),
            "cell {c} outside {}x{} grid",
            self.width,
            self.height
        );
        c.y * self.width + c.x
    }

    /// Bounds-checked cell lookup.
    pub fn cell_at(&self, x: usize, y: usize) -> Coord {
        let c = Coord::new(x, y);
        self.index_of(c);
        c
    }

    /// The neighbouring cell one step in `dir`, or `None` past the edge.
    #[inline]
    pub fn adjacent(&self, c: Coord, dir: Direction) -> Option<Coord> {
        debug_assert!(self.contains(c));
        let (dx, dy) = dir.delta();
        let x = c.x.checked_add_signed(dx)?;
        let y = c.y.checked_add_signed(dy)?;
        let next = Coord::new(x, y);
        self.contains(next).then_some(next)
    }

    #[inline]
    pub fn tile_at(&self, c: Coord) -> Option<TileId> {
        self.cells[self.index_of(c)]
    }

    #[inline]
    pub fn is_occupied(&self, c: Coord) -> bool {
        self.tile_at(c).is_some()
    }

    pub fn value_at(&self, c: Coord) -> Option<u64> {
        self.tile_at(c).map(|id| self.tile(id).value())
    }

    /// Look up a live tile. Panics on a stale handle.
    #[inline]
    pub fn tile(&self, id: TileId) -> &Tile {
        self.tiles
            .get(id)
            .unwrap_or_else(|| panic!("stale tile handle {id:?}"))
    }

    #[inline]
    pub fn try_tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    #[inline]
    pub(crate) fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        self.tiles
            .get_mut(id)
            .unwrap_or_else(|| panic!("stale tile handle {id:?}"))
    }

    /// Iterate over live tiles (arena order, not board order).
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> + '_ {
        self.tiles.iter()
    }

    /// Unoccupied cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| Coord::new(idx % self.width, idx / self.width))
            .collect()
    }

    /// Choose an unoccupied cell uniformly (as far as `picker` is uniform).
    /// Returns `None` on a full grid.
    ///
    /// Panics if `picker` answers outside `0..candidates`.
    pub fn random_empty_cell<P: CellPicker + ?Sized>(&self, picker: &mut P) -> Option<Coord> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let idx = picker.pick(empty.len());
        assert!(idx < empty.len(), "picker returned {idx} of {} candidates", empty.len());
        Some(empty[idx])
    }

    /// Empty every cell and destroy every tile.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.tiles.clear();
    }

    /// Row-major tile values, `0` for empty cells.
    pub fn values(&self) -> Vec<u64> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0, |id| self.tile(id).value()))
            .collect()
    }

    pub fn highest_tile(&self) -> u64 {
        self.tiles().map(|(_, t)| t.value()).max().unwrap_or(0)
    }

    pub fn tile_sum(&self) -> u64 {
        self.tiles().map(|(_, t)| t.value()).sum()
    }

    /// Check the cell <-> tile links: every occupied cell's tile points back
    /// at it, and there are exactly as many live tiles as occupied cells.
    pub fn is_consistent(&self) -> bool {
        let mut occupied = 0;
        for (idx, cell) in self.cells.iter().enumerate() {
            if let Some(id) = cell {
                occupied += 1;
                let here = Coord::new(idx % self.width, idx / self.width);
                match self.tiles.get(*id) {
                    Some(t) if t.cell() == here => {}
                    _ => return false,
                }
            }
        }
        occupied == self.tiles.len()
            && self
                .tiles
                .iter()
                .all(|(id, t)| self.contains(t.cell()) && self.tile_at(t.cell()) == Some(id))
    }
}

fn format_val(val: u64, width: usize) -> String {
    let s = if val == 0 {
        String::from(".")
    } else {
        val.to_string()
    };
    format!("{s:^width$}")
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell_w = self.highest_tile().to_string().len().max(4) + 2;
        let rule = "-".repeat(cell_w * self.width + self.width.saturating_sub(1));
        for y in 0..self.height {
            if y > 0 {
                writeln!(f, "{rule}")?;
            }
            let row: Vec<String> = (0..self.width)
                .map(|x| format_val(self.value_at(Coord::new(x, y)).unwrap_or(0), cell_w))
                .collect();
            writeln!(f, "{}", row.join("|"))?;
        }
        Ok(())
    }
}
