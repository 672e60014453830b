//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the sliding-tile rules and session state. It has
//! **no dependencies** on rendering, input capture, storage or networking:
//!
//! - **Deterministic**: a seed plus a move list reproduces a session exactly
//! - **Testable**: turn resolution is a pure function of grid and direction
//! - **Portable**: runs headless, under a UI, or inside a replay harness
//!
//! # Module Structure
//!
//! - [`tile`]: identity-bearing tile values
//! - [`grid`]: NxN tile container with bounds-safe queries
//! - [`turn`]: farthest-position search, merging and the per-turn delta
//! - [`game_manager`]: turn state machine, latches, spawning, terminal detection
//! - [`rng`]: seeded LCG used for spawns
//! - [`snapshot`]: persisted session layout and restored-state validation
//! - [`prover`]: attestation data export
//!
//! # Game Rules
//!
//! - Every accepted turn slides all tiles toward one edge; equal neighbours merge once
//! - A merge of two `v` tiles adds `2v` to the score
//! - After a turn that changed the grid, one tile spawns (2 with 90%, 4 with 10%)
//! - Creating a 2048 tile latches `won`; a full grid with no equal neighbours latches `over`
//!
//! # Example
//!
//! ```
//! use zk2048_core::{GameManager, Grid, TurnOutcome};
//! use zk2048_types::Direction;
//!
//! let grid = Grid::from_rows(&[&[2, 2, 0, 0], &[0; 4], &[0; 4], &[0; 4]]);
//! let mut game = GameManager::from_grid(grid, 12345);
//!
//! let outcome = game.apply_move(Direction::Left);
//! assert!(matches!(outcome, TurnOutcome::Applied(_)));
//! assert_eq!(game.score(), 4);
//! assert_eq!(game.moves_history(), &[Direction::Left]);
//! ```

pub mod game_manager;
pub mod grid;
pub mod prover;
pub mod rng;
pub mod snapshot;
pub mod tile;
pub mod turn;

pub use zk2048_types as types;

// Re-export commonly used types for convenience
pub use game_manager::{GameManager, TurnOutcome, TurnReport};
pub use grid::Grid;
pub use prover::{CircuitInput, ProverData};
pub use rng::SimpleRng;
pub use snapshot::{GridSnapshot, SavedState, StateError, TileSnapshot};
pub use tile::{Tile, TileId};
pub use turn::{resolve_turn, Resolution, TurnDelta};
