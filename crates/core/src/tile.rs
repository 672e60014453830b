//! Tile module - a single valued tile on the grid
//!
//! A tile only knows its own coordinates and value. The grid is the only
//! writer of tile coordinates; per-turn animation data (previous position,
//! merge sources) lives in [`TurnDelta`](crate::turn::TurnDelta) instead.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::snapshot::TileSnapshot;
use crate::types::Position;

static NEXT_TILE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique tile identity.
///
/// Only used for presentation continuity (matching a tile across frames);
/// it is never persisted and is not stable across a save/restore cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u64);

impl TileId {
    fn next() -> Self {
        Self(NEXT_TILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A tile occupying one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    position: Position,
    value: u32,
}

impl Tile {
    /// Create a tile with a fresh identity.
    ///
    /// `value` must be a power of two, at least 2.
    pub fn new(position: Position, value: u32) -> Self {
        debug_assert!(value >= 2 && value.is_power_of_two());
        Self {
            id: TileId::next(),
            position,
            value,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Overwrite the current coordinates (grid-mediated moves only)
    pub(crate) fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Persisted form: position and value only
    pub fn serialize(&self) -> TileSnapshot {
        TileSnapshot::new(self.position.x as i64, self.position.y as i64, self.value as u64)
    }
}
