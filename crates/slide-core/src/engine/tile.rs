use super::grid::Grid;
use super::state::Coord;

/// Handle to a live tile in a [`Grid`]'s tile arena.
///
/// Slots are reused after a tile is destroyed; the generation makes a handle
/// to a destroyed tile distinguishable from the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    slot: u32,
    generation: u32,
}

/// A value-bearing tile. Its `cell` is the back-reference to the grid cell
/// that holds its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    value: u64,
    locked: bool,
    cell: Coord,
}

impl Tile {
    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// True once the tile has absorbed a merge during the current round.
    #[inline]
    pub fn locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn cell(&self) -> Coord {
        self.cell
    }

    /// Zero-based step on the value ladder: 2 -> 0, 4 -> 1, 8 -> 2, ...
    ///
    /// Presentation layers index their palettes with this and clamp to the
    /// palette length.
    #[inline]
    pub fn rank(&self) -> u32 {
        self.value.trailing_zeros().saturating_sub(1)
    }
}

/// True if `value` is a legal tile value (a power of two, at least 2).
#[inline]
pub fn is_tile_value(value: u64) -> bool {
    value >= 2 && value.is_power_of_two()
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    tile: Option<Tile>,
}

/// Slot arena owning every live tile of a grid.
#[derive(Debug, Clone, Default)]
pub(crate) struct TileArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl TileArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    pub(crate) fn insert(&mut self, tile: Tile) -> TileId {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            debug_assert!(entry.tile.is_none());
            entry.tile = Some(tile);
            return TileId {
                slot,
                generation: entry.generation,
            };
        }
        let slot = u32::try_from(self.slots.len()).expect("tile arena exceeded u32 slots");
        self.slots.push(Slot {
            generation: 0,
            tile: Some(tile),
        });
        TileId {
            slot,
            generation: 0,
        }
    }

    pub(crate) fn remove(&mut self, id: TileId) -> Option<Tile> {
        let entry = self.slots.get_mut(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let tile = entry.tile.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.live -= 1;
        Some(tile)
    }

    #[inline]
    pub(crate) fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots
            .get(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.tile.as_ref())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.tile.as_mut())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, s)| {
            s.tile.as_ref().map(|t| {
                (
                    TileId {
                        slot: slot as u32,
                        generation: s.generation,
                    },
                    t,
                )
            })
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.slots.iter_mut().filter_map(|s| s.tile.as_mut())
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Destroy every tile. Outstanding handles become stale.
    pub(crate) fn clear(&mut self) {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.tile.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(slot as u32);
            }
        }
        self.live = 0;
    }
}

// Tile lifecycle. These keep the cell -> tile and tile -> cell links in step;
// every precondition listed here is a caller bug and panics.
impl Grid {
    /// Attach a fresh, unlocked tile of `value` to the empty cell `cell`.
    ///
    /// Panics if `cell` is out of bounds or already occupied.
    pub fn spawn_tile(&mut self, cell: Coord, value: u64) -> TileId {
        let idx = self.index_of(cell);
        assert!(
            self.cells[idx].is_none(),
            "spawn onto occupied cell {cell}"
        );
        debug_assert!(is_tile_value(value), "invalid tile value {value}");
        let id = self.tiles.insert(Tile {
            value,
            locked: false,
            cell,
        });
        self.cells[idx] = Some(id);
        id
    }

    /// Slide tile `id` to the empty cell `to` without merging.
    ///
    /// Panics if `id` is stale or `to` is occupied.
    pub fn move_tile(&mut self, id: TileId, to: Coord) {
        let to_idx = self.index_of(to);
        assert!(self.cells[to_idx].is_none(), "move onto occupied cell {to}");
        let from = self.tile(id).cell;
        let from_idx = self.index_of(from);
        self.cells[from_idx] = None;
        self.cells[to_idx] = Some(id);
        self.tile_mut(id).cell = to;
    }

    /// Detach and destroy `source`, locking the tile that occupies
    /// `target_cell`. Returns the target's id.
    ///
    /// The target's value is left untouched; callers grow it with
    /// [`Grid::set_tile_value`].
    pub fn merge_tile(&mut self, source: TileId, target_cell: Coord) -> TileId {
        let target = self
            .tile_at(target_cell)
            .unwrap_or_else(|| panic!("merge into empty cell {target_cell}"));
        assert_ne!(source, target, "tile cannot merge into itself");
        let removed = self
            .tiles
            .remove(source)
            .unwrap_or_else(|| panic!("stale tile handle {source:?}"));
        let src_idx = self.index_of(removed.cell);
        self.cells[src_idx] = None;
        self.tile_mut(target).locked = true;
        target
    }

    pub fn set_tile_value(&mut self, id: TileId, value: u64) {
        debug_assert!(is_tile_value(value), "invalid tile value {value}");
        self.tile_mut(id).value = value;
    }

    /// Reset every tile's per-round merge lock.
    pub fn unlock_all(&mut self) {
        for tile in self.tiles.iter_mut() {
            tile.locked = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_follows_value_ladder() {
        let mut g = Grid::new(2, 1);
        let a = g.spawn_tile(Coord::new(0, 0), 2);
        let b = g.spawn_tile(Coord::new(1, 0), 64);
        assert_eq!(g.tile(a).rank(), 0);
        assert_eq!(g.tile(b).rank(), 5);
    }

    #[test]
    fn merge_destroys_source_and_locks_target() {
        let mut g = Grid::new(3, 1);
        let src = g.spawn_tile(Coord::new(0, 0), 4);
        let dst = g.spawn_tile(Coord::new(2, 0), 4);
        let got = g.merge_tile(src, Coord::new(2, 0));
        assert_eq!(got, dst);
        assert!(g.try_tile(src).is_none());
        assert!(g.tile(dst).locked());
        // Value growth is the caller's job.
        assert_eq!(g.tile(dst).value(), 4);
        assert_eq!(g.occupied_count(), 1);
        assert!(g.is_consistent());
    }

    #[test]
    fn reused_slot_does_not_revive_stale_handle() {
        let mut g = Grid::new(2, 1);
        let a = g.spawn_tile(Coord::new(0, 0), 2);
        let b = g.spawn_tile(Coord::new(1, 0), 2);
        g.merge_tile(a, Coord::new(1, 0));
        let c = g.spawn_tile(Coord::new(0, 0), 2);
        assert_ne!(a, c);
        assert!(g.try_tile(a).is_none());
        assert_eq!(g.tile(c).cell(), Coord::new(0, 0));
        assert_eq!(g.tile(b).cell(), Coord::new(1, 0));
    }

    #[test]
    fn move_updates_both_links() {
        let mut g = Grid::new(4, 4);
        let id = g.spawn_tile(Coord::new(0, 0), 2);
        g.move_tile(id, Coord::new(3, 2));
        assert_eq!(g.tile_at(Coord::new(0, 0)), None);
        assert_eq!(g.tile_at(Coord::new(3, 2)), Some(id));
        assert_eq!(g.tile(id).cell(), Coord::new(3, 2));
        assert!(g.is_consistent());
    }

    #[test]
    fn unlock_all_clears_locks() {
        let mut g = Grid::new(2, 1);
        let a = g.spawn_tile(Coord::new(0, 0), 2);
        let b = g.spawn_tile(Coord::new(1, 0), 2);
        g.merge_tile(a, Coord::new(1, 0));
        assert!(g.tile(b).locked());
        g.unlock_all();
        assert!(!g.tile(b).locked());
    }

    #[test]
    #[should_panic(expected = "spawn onto occupied cell")]
    fn spawn_onto_occupied_cell_panics() {
        let mut g = Grid::new(2, 2);
        g.spawn_tile(Coord::new(1, 1), 2);
        g.spawn_tile(Coord::new(1, 1), 2);
    }

    #[test]
    fn tile_values_are_powers_of_two_from_two() {
        assert!(is_tile_value(2));
        assert!(is_tile_value(2048));
        assert!(!is_tile_value(0));
        assert!(!is_tile_value(1));
        assert!(!is_tile_value(6));
    }
}
