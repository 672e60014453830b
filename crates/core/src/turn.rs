//! Turn resolution - sliding and merging as a pure function
//!
//! [`resolve_turn`] takes a grid and a direction and returns the resulting grid
//! together with everything the turn produced (score gained, win reached, the
//! animation delta). It does not spawn; the caller commits the result and then
//! spawns with its own randomness.
//!
//! Traversal starts at the far edge in the direction of travel, so each tile is
//! visited exactly once and lands before anything behind it is considered.

use crate::grid::Grid;
use crate::tile::{Tile, TileId};
use crate::types::{Direction, Position, WIN_VALUE};

/// Where a tile was before the turn started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousPosition {
    pub id: TileId,
    pub position: Position,
}

/// A tile created by merging two equal tiles this turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merge {
    /// The new tile, at the merge position, holding double the value
    pub tile: Tile,
    /// `[moving tile, target tile]`
    pub sources: [TileId; 2],
}

/// Transient per-turn data for presentation.
///
/// Computed fresh every turn and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnDelta {
    pub previous_positions: Vec<PreviousPosition>,
    pub merges: Vec<Merge>,
    pub spawned: Option<Tile>,
}

impl TurnDelta {
    /// Record the pre-turn position of every tile on the grid
    pub fn save_positions(grid: &Grid) -> Self {
        Self {
            previous_positions: grid
                .tiles()
                .map(|tile| PreviousPosition {
                    id: tile.id(),
                    position: tile.position(),
                })
                .collect(),
            merges: Vec::new(),
            spawned: None,
        }
    }

    pub fn previous_position(&self, id: TileId) -> Option<Position> {
        self.previous_positions
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.position)
    }

    /// Merge sources of a tile created this turn
    pub fn merged_from(&self, id: TileId) -> Option<[TileId; 2]> {
        self.merges
            .iter()
            .find(|m| m.tile.id() == id)
            .map(|m| m.sources)
    }
}

/// Outcome of sliding a grid in one direction
#[derive(Debug, Clone)]
pub struct Resolution {
    pub grid: Grid,
    pub delta: TurnDelta,
    /// Sum of the values of all tiles created by merges, saturating at `u32::MAX`
    pub score_gained: u32,
    /// Some merge produced [`WIN_VALUE`]
    pub reached_win: bool,
    /// Some tile ended at different coordinates
    pub moved: bool,
}

/// Cell visiting order: reversed along an axis when travel is +1 on it
pub fn build_traversals(size: usize, direction: Direction) -> (Vec<i32>, Vec<i32>) {
    let (dx, dy) = direction.vector();
    let mut xs: Vec<i32> = (0..size as i32).collect();
    let mut ys: Vec<i32> = (0..size as i32).collect();
    if dx == 1 {
        xs.reverse();
    }
    if dy == 1 {
        ys.reverse();
    }
    (xs, ys)
}

/// Slide every tile of `grid` towards `direction`, merging equal pairs once.
///
/// Tiles whose doubled value would not fit in a `u32` never merge.
pub fn resolve_turn(grid: &Grid, direction: Direction) -> Resolution {
    let mut grid = grid.clone();
    let mut delta = TurnDelta::save_positions(&grid);
    let size = grid.size();
    let mut merged_here = vec![false; size * size];
    let mut score_gained = 0u32;
    let mut reached_win = false;
    let mut moved = false;

    let (xs, ys) = build_traversals(size, direction);
    for &x in &xs {
        for &y in &ys {
            let cell = Position::new(x, y);
            let Some(tile) = grid.cell_content(cell) else {
                continue;
            };
            let (value, moving_id) = (tile.value(), tile.id());

            let (farthest, next) = grid.find_farthest_position(cell, direction);
            let doubled = value.checked_mul(2);
            let target = grid
                .cell_content(next)
                .filter(|t| t.value() == value && !merged_here[slot(size, next)])
                .map(Tile::id)
                .zip(doubled);

            match target {
                Some((target_id, doubled)) => {
                    let merged = Tile::new(next, doubled);
                    grid.take(cell);
                    grid.insert_tile(merged.clone());
                    merged_here[slot(size, next)] = true;

                    score_gained = score_gained.saturating_add(merged.value());
                    if merged.value() == WIN_VALUE {
                        reached_win = true;
                    }
                    delta.merges.push(Merge {
                        tile: merged,
                        sources: [moving_id, target_id],
                    });
                    moved = true;
                }
                None => {
                    if farthest != cell && grid.move_tile(cell, farthest) {
                        moved = true;
                    }
                }
            }
        }
    }

    Resolution {
        grid,
        delta,
        score_gained,
        reached_win,
        moved,
    }
}

#[inline(always)]
fn slot(size: usize, pos: Position) -> usize {
    pos.x as usize * size + pos.y as usize
}
