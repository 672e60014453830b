//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core rules, session glue, prover export).
//!
//! # Grid Coordinates
//!
//! Cells are addressed as `(x, y)` where `x` is the column (left to right) and `y` is
//! the row (top to bottom). Both range over `0..size`. A [`Position`] may hold
//! coordinates outside the grid while a farthest-position search steps past an edge.
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRID_SIZE` | 4 | Canonical 4x4 board |
//! | `START_TILES` | 2 | Tiles spawned on a fresh board |
//! | `WIN_VALUE` | 2048 | Tile value that latches `won` |
//! | `SPAWN_FOUR_PERCENT` | 10 | Chance that a spawned tile is a 4 |
//!
//! # Restored State Limits
//!
//! Externally supplied sessions are rejected unless they fit these bounds:
//!
//! - `MAX_TILE_VALUE`: 131072 (largest reachable tile on a 4x4 board)
//! - `MAX_SCORE`: 1,000,000
//! - `MAX_MOVES`: 10,000 recorded directions
//!
//! # Examples
//!
//! ```
//! use zk2048_types::{Direction, Position, WIN_VALUE};
//!
//! let dir = Direction::from_str("left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.code(), 3);
//! assert_eq!(dir.vector(), (-1, 0));
//!
//! let p = Position::new(1, 2).offset(Direction::Up);
//! assert_eq!(p, Position::new(1, 1));
//!
//! assert_eq!(WIN_VALUE, 2048);
//! ```

/// Canonical board size (4x4)
pub const DEFAULT_GRID_SIZE: usize = 4;

/// Number of random tiles placed on a fresh board
pub const START_TILES: usize = 2;

/// Merging into this value latches the `won` flag
pub const WIN_VALUE: u32 = 2048;

/// Probability (in percent) that a spawned tile has value 4 instead of 2
pub const SPAWN_FOUR_PERCENT: u32 = 10;

/// Largest tile value accepted from a restored session
pub const MAX_TILE_VALUE: u64 = 131_072;

/// Largest score accepted from a restored session
pub const MAX_SCORE: i64 = 1_000_000;

/// Longest move history accepted from a restored session
pub const MAX_MOVES: usize = 10_000;

/// Fixed length of the move array consumed by the external proving circuit
pub const MAX_CIRCUIT_MOVES: usize = 1000;


/// The four sliding directions
///
/// The numeric codes are part of the recorded move history and of the
/// attestation export, so they must never change:
/// - **Up**: 0
/// - **Right**: 1
/// - **Down**: 2
/// - **Left**: 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in code order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Decode a move-history entry
    ///
    /// # Examples
    ///
    /// ```
    /// use zk2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_code(0), Some(Direction::Up));
    /// assert_eq!(Direction::from_code(3), Some(Direction::Left));
    /// assert_eq!(Direction::from_code(7), None);
    /// ```
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Numeric code recorded in the move history
    pub fn code(&self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// Unit step `(dx, dy)` in grid coordinates (y grows downwards)
    pub fn vector(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names, single letters, or the numeric code:
    /// "up" | "u" | "0", "right" | "r" | "1", "down" | "d" | "2", "left" | "l" | "3"
    ///
    /// # Examples
    ///
    /// ```
    /// use zk2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("r"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("2"), Some(Direction::Down));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" | "0" => Some(Direction::Up),
            "right" | "r" | "1" => Some(Direction::Right),
            "down" | "d" | "2" => Some(Direction::Down),
            "left" | "l" | "3" => Some(Direction::Left),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

/// A cell coordinate on the grid
///
/// Signed so that a search can step one cell past any edge and report it
/// as the blocking position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one step in `direction`
    pub fn offset(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
