//! Engine module - session orchestration around the core rules
//!
//! The core crate is a pure state machine. This crate connects it to the
//! outside world through two narrow contracts:
//!
//! - [`StateStore`]: load/save/clear the serialized session and track the best score
//! - [`Presenter`]: receive the grid and `{score, over, won, bestScore, terminated}`
//!   after setup and after every accepted turn
//!
//! [`Session`] drives both. Restored sessions are validated before use; a
//! rejected or unreadable one is logged, cleared, and replaced by a fresh game.
//!
//! # Environment Variables
//!
//! See [`EngineConfig::from_env`]:
//!
//! - `ZK2048_SIZE`: board size (default 4)
//! - `ZK2048_SEED`: spawn RNG seed (default 1)
//! - `ZK2048_STATE_DIR`: directory for [`JsonFileStore`]
//! - `ZK2048_PROVER_OUT`: prover JSON output path
//!
//! # Example
//!
//! ```
//! use zk2048_engine::{EngineConfig, MemoryStore, NullPresenter, Session};
//! use zk2048_types::Direction;
//!
//! let mut session = Session::new(EngineConfig::default(), MemoryStore::new(), NullPresenter);
//! for dir in Direction::ALL {
//!     session.move_in(dir);
//! }
//! let data = session.prover_data();
//! assert_eq!(data.total_moves, session.game().moves_history().len());
//! ```

pub mod config;
pub mod presenter;
pub mod session;
pub mod store;

pub use zk2048_core as core;
pub use zk2048_types as types;

pub use config::EngineConfig;
pub use presenter::{ActuateMeta, NullPresenter, Presenter};
pub use session::{ExportError, Session};
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreError, MAX_STATE_AGE};
