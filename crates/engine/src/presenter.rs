//! Presentation contract.
//!
//! After setup and after every accepted turn the session hands the presenter a
//! grid snapshot plus [`ActuateMeta`]. Presenters are notified synchronously and
//! must not call back into the engine.

use serde::Serialize;

use crate::core::{GridSnapshot, TurnDelta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActuateMeta {
    pub score: u32,
    pub over: bool,
    pub won: bool,
    pub best_score: u32,
    pub terminated: bool,
}

pub trait Presenter {
    /// Show the current grid. `delta` is present only for an accepted turn.
    fn actuate(&mut self, grid: &GridSnapshot, meta: &ActuateMeta, delta: Option<&TurnDelta>);

    /// Dismiss any won/lost message
    fn continue_game(&mut self) {}
}

/// Presenter that discards everything (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn actuate(&mut self, _grid: &GridSnapshot, _meta: &ActuateMeta, _delta: Option<&TurnDelta>) {}
}
