//! Serialized session forms and restored-state validation.
//!
//! The persisted layout is `{grid:{size,cells}, score, over, won, keepPlaying, movesHistory, rngState}`
//! where `cells[x][y]` is either `null` or `{position:{x,y}, value}`. Numeric fields are
//! deliberately wide and signed so that a tampered document still parses and can be
//! rejected by [`SavedState::validate`] instead of failing deserialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MAX_MOVES, MAX_SCORE, MAX_TILE_VALUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub position: PositionSnapshot,
    pub value: u64,
}

impl TileSnapshot {
    pub fn new(x: i64, y: i64, value: u64) -> Self {
        Self {
            position: PositionSnapshot { x, y },
            value,
        }
    }
}

/// Grid matrix indexed `cells[x][y]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<TileSnapshot>>>,
}

impl GridSnapshot {
    /// Tile value at `(x, y)`, if any
    pub fn value_at(&self, x: usize, y: usize) -> Option<u64> {
        self.cells.get(x)?.get(y)?.map(|t| t.value)
    }
}

/// A whole session as handed to external persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub grid: GridSnapshot,
    pub score: i64,
    pub over: bool,
    pub won: bool,
    #[serde(default)]
    pub keep_playing: bool,
    #[serde(default)]
    pub moves_history: Vec<i64>,
    /// Spawn RNG state at save time; absent in documents from older writers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_state: Option<u32>,
}

/// Why a restored session was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("grid size {found} does not match expected {expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("grid cells are not a {size}x{size} matrix")]
    Dimensions { size: usize },
    #[error("invalid tile value {value} at ({x}, {y})")]
    TileValue { x: usize, y: usize, value: u64 },
    #[error("tile stored at ({x}, {y}) claims position ({claimed_x}, {claimed_y})")]
    MisplacedTile {
        x: usize,
        y: usize,
        claimed_x: i64,
        claimed_y: i64,
    },
    #[error("score {0} outside accepted range")]
    Score(i64),
    #[error("move history too long: {0} entries")]
    TooManyMoves(usize),
    #[error("invalid move direction {0}")]
    Direction(i64),
}

/// Power of two within `[2, MAX_TILE_VALUE]`
pub fn is_valid_tile_value(value: u64) -> bool {
    (2..=MAX_TILE_VALUE).contains(&value) && value.is_power_of_two()
}

impl SavedState {
    /// Check a restored session before trusting it.
    ///
    /// Accepts only an exactly `size`x`size` grid of valid tiles sitting at their own
    /// coordinates, a score in `[0, MAX_SCORE]` and at most `MAX_MOVES` directions in `0..=3`.
    pub fn validate(&self, size: usize) -> Result<(), StateError> {
        if self.score < 0 || self.score > MAX_SCORE {
            return Err(StateError::Score(self.score));
        }

        if self.moves_history.len() > MAX_MOVES {
            return Err(StateError::TooManyMoves(self.moves_history.len()));
        }
        if let Some(&bad) = self.moves_history.iter().find(|&&m| !(0..=3).contains(&m)) {
            return Err(StateError::Direction(bad));
        }

        if self.grid.size != size {
            return Err(StateError::SizeMismatch {
                expected: size,
                found: self.grid.size,
            });
        }
        if self.grid.cells.len() != size || self.grid.cells.iter().any(|col| col.len() != size) {
            return Err(StateError::Dimensions { size });
        }

        for (x, col) in self.grid.cells.iter().enumerate() {
            for (y, cell) in col.iter().enumerate() {
                let Some(tile) = cell else {
                    continue;
                };
                if !is_valid_tile_value(tile.value) {
                    return Err(StateError::TileValue {
                        x,
                        y,
                        value: tile.value,
                    });
                }
                if tile.position.x != x as i64 || tile.position.y != y as i64 {
                    return Err(StateError::MisplacedTile {
                        x,
                        y,
                        claimed_x: tile.position.x,
                        claimed_y: tile.position.y,
                    });
                }
            }
        }

        Ok(())
    }
}
