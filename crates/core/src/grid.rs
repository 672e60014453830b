//! Grid module - the NxN tile container
//!
//! Cells are stored in a flat vector indexed `x * size + y`, mirroring the
//! persisted `cells[x][y]` layout. The grid owns its tiles by value and is the
//! only place tile coordinates are written, which keeps the invariant
//! "a tile in slot (x, y) reports position (x, y)" local to this module.
//!
//! Every bounds-sensitive query treats out-of-bounds coordinates as "no
//! content" rather than failing.

use crate::rng::SimpleRng;
use crate::snapshot::GridSnapshot;
use crate::tile::Tile;
use crate::types::{Direction, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an empty `size`x`size` grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Rebuild a grid from its persisted form.
    ///
    /// Tiles get fresh identities. The snapshot should already have passed
    /// [`SavedState::validate`](crate::snapshot::SavedState::validate); missing
    /// rows or cells are treated as empty.
    pub fn from_state(state: &GridSnapshot) -> Self {
        let mut grid = Self::new(state.size);
        for x in 0..state.size {
            for y in 0..state.size {
                let cell = state.cells.get(x).and_then(|col| col.get(y)).copied().flatten();
                if let Some(snapshot) = cell {
                    let position = Position::new(x as i32, y as i32);
                    grid.insert_tile(Tile::new(position, snapshot.value as u32));
                }
            }
        }
        grid
    }

    /// Build a grid from visual rows: `rows[y][x]`, with 0 meaning empty.
    ///
    /// Panics if `rows` is not square.
    pub fn from_rows(rows: &[&[u32]]) -> Self {
        let size = rows.len();
        assert!(
            rows.iter().all(|row| row.len() == size),
            "rows must form a square matrix"
        );

        let mut grid = Self::new(size);
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    grid.insert_tile(Tile::new(Position::new(x as i32, y as i32), value));
                }
            }
        }
        grid
    }

    /// Visual rows `rows[y][x]`, with 0 meaning empty
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.size as i32)
            .map(|y| {
                (0..self.size as i32)
                    .map(|x| {
                        self.cell_content(Position::new(x, y))
                            .map_or(0, Tile::value)
                    })
                    .collect()
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.within_bounds(pos) {
            return None;
        }
        Some(pos.x as usize * self.size + pos.y as usize)
    }

    /// `0 <= x < size && 0 <= y < size`
    pub fn within_bounds(&self, pos: Position) -> bool {
        let size = self.size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Tile at `pos`, or `None` when empty or out of bounds
    pub fn cell_content(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// In bounds and empty
    pub fn cell_available(&self, pos: Position) -> bool {
        matches!(self.index(pos), Some(idx) if self.cells[idx].is_none())
    }

    pub fn cell_occupied(&self, pos: Position) -> bool {
        self.cell_content(pos).is_some()
    }

    /// Empty cells, x outer and y inner.
    ///
    /// Spawn placement indexes into this list, so the order is part of the
    /// deterministic replay contract.
    pub fn available_cells(&self) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.cell_available(pos))
            .collect()
    }

    pub fn cells_available(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// Uniformly chosen entry of [`available_cells`](Self::available_cells)
    pub fn random_available_cell(&self, rng: &mut SimpleRng) -> Option<Position> {
        let cells = self.available_cells();
        if cells.is_empty() {
            return None;
        }
        let pick = rng.next_range(cells.len() as u32) as usize;
        cells.get(pick).copied()
    }

    /// Place a tile at its own coordinates, returning whatever it replaced
    pub fn insert_tile(&mut self, tile: Tile) -> Option<Tile> {
        let idx = self.index(tile.position());
        debug_assert!(idx.is_some(), "tile inserted out of bounds: {:?}", tile.position());
        self.cells[idx?].replace(tile)
    }

    /// Clear the slot at the tile's own coordinates
    pub fn remove_tile(&mut self, tile: &Tile) -> Option<Tile> {
        self.take(tile.position())
    }

    /// Remove and return the tile at `pos`
    pub fn take(&mut self, pos: Position) -> Option<Tile> {
        let idx = self.index(pos)?;
        self.cells[idx].take()
    }

    /// Move the tile at `from` into the empty slot `to`, updating its coordinates.
    ///
    /// Returns false (and changes nothing) if `from` is empty or `to` is not available.
    pub fn move_tile(&mut self, from: Position, to: Position) -> bool {
        if from == to {
            return self.cell_occupied(from);
        }
        if !self.cell_available(to) {
            return false;
        }
        let Some(mut tile) = self.take(from) else {
            return false;
        };
        tile.update_position(to);
        self.insert_tile(tile);
        true
    }

    /// All coordinates, x outer and y inner
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size as i32;
        (0..size).flat_map(move |x| (0..size).map(move |y| Position::new(x, y)))
    }

    /// Occupied cells, x outer and y inner
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    /// Step from `cell` along `direction` while the next cell is in bounds and empty.
    ///
    /// Returns `(farthest, next)`: the last free position reached (or `cell` itself)
    /// and the position just beyond it, which is either out of bounds or occupied.
    pub fn find_farthest_position(&self, cell: Position, direction: Direction) -> (Position, Position) {
        let mut previous = cell;
        let mut next = cell.offset(direction);
        while self.cell_available(next) {
            previous = next;
            next = next.offset(direction);
        }
        (previous, next)
    }

    /// Some occupied cell has an equal-valued 4-neighbour
    pub fn tile_matches_available(&self) -> bool {
        self.tiles().any(|tile| {
            Direction::ALL.iter().any(|&dir| {
                self.cell_content(tile.position().offset(dir))
                    .is_some_and(|other| other.value() == tile.value())
            })
        })
    }

    /// Persisted form `{size, cells[x][y]}`
    pub fn serialize(&self) -> GridSnapshot {
        let cells = (0..self.size)
            .map(|x| {
                (0..self.size)
                    .map(|y| self.cells[x * self.size + y].as_ref().map(Tile::serialize))
                    .collect()
            })
            .collect();
        GridSnapshot {
            size: self.size,
            cells,
        }
    }

    /// Every occupied slot holds a tile reporting that slot's coordinates
    pub fn is_consistent(&self) -> bool {
        self.positions()
            .all(|pos| self.cell_content(pos).map_or(true, |t| t.position() == pos))
    }
}
