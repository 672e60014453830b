//! zk2048 (workspace facade crate).
//!
//! Re-exports the member crates under one stable path:
//! `zk2048::{types, core, engine}`.

pub use zk2048_core as core;
pub use zk2048_engine as engine;
pub use zk2048_types as types;
