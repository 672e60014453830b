//! Session glue between the core state machine and its collaborators.
//!
//! A [`Session`] owns the [`GameManager`], a [`StateStore`] and a [`Presenter`].
//! It restores or starts a game on construction, and after every accepted
//! turn it updates the best score, persists (or clears) the session and
//! notifies the presenter. Each command runs to completion before returning.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::core::{
    CircuitInput, GameManager, ProverData, SavedState, StateError, TurnDelta, TurnOutcome,
};
use crate::presenter::{ActuateMeta, Presenter};
use crate::store::{StateStore, StoreError};
use crate::types::{Direction, MAX_CIRCUIT_MOVES};

/// Why attestation data was withheld
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("game must be finished before exporting")]
    NotTerminated,
    #[error("no moves recorded")]
    NoMoves,
    #[error("score is zero")]
    NoScore,
    #[error("session state failed validation: {0}")]
    InvalidState(#[from] StateError),
    #[error("stored session does not match the live session")]
    StateMismatch,
    #[error("{moves} moves exceed the circuit limit of {limit}")]
    TooManyMovesForCircuit { moves: usize, limit: usize },
    #[error("could not read stored session: {0}")]
    Store(#[from] StoreError),
    #[error("could not encode prover data: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not write prover data: {0}")]
    Write(#[from] io::Error),
}

pub struct Session<S: StateStore, P: Presenter> {
    config: EngineConfig,
    game: GameManager,
    store: S,
    presenter: P,
}

impl<S: StateStore, P: Presenter> Session<S, P> {
    /// Restore the stored session if it validates, otherwise start fresh,
    /// then notify the presenter.
    pub fn new(config: EngineConfig, mut store: S, presenter: P) -> Self {
        let game = Self::setup(&config, &mut store);
        let mut session = Self {
            config,
            game,
            store,
            presenter,
        };
        session.actuate(None);
        session
    }

    fn setup(config: &EngineConfig, store: &mut S) -> GameManager {
        let previous = match store.load_state() {
            Ok(previous) => previous,
            Err(err) => {
                warn!(error = %err, "unreadable saved session, starting new game");
                Self::discard_stored(store);
                None
            }
        };

        let Some(saved) = previous else {
            return GameManager::new(config.size, config.seed);
        };

        match GameManager::restore(&saved, config.size, config.seed) {
            Ok(game) => {
                info!(score = game.score(), moves = game.moves_history().len(), "restored saved session");
                game
            }
            Err(err) => {
                warn!(error = %err, "invalid saved session, starting new game");
                Self::discard_stored(store);
                GameManager::new(config.size, config.seed)
            }
        }
    }

    fn discard_stored(store: &mut S) {
        if let Err(err) = store.clear_state() {
            warn!(error = %err, "failed to clear saved session");
        }
    }

    /// Play one turn; collaborators are notified only if the grid changed.
    pub fn move_in(&mut self, direction: Direction) -> TurnOutcome {
        let outcome = self.game.apply_move(direction);
        if let TurnOutcome::Applied(report) = &outcome {
            self.actuate(Some(&report.delta));
        }
        outcome
    }

    /// Drop the stored session and start over
    pub fn restart(&mut self) {
        Self::discard_stored(&mut self.store);
        self.presenter.continue_game();
        self.game.restart();
        self.actuate(None);
    }

    /// Keep playing after reaching the winning tile
    pub fn continue_playing(&mut self) {
        self.game.continue_playing();
        self.presenter.continue_game();
    }

    fn actuate(&mut self, delta: Option<&TurnDelta>) {
        let score = self.game.score();
        if self.store.best_score() < score {
            if let Err(err) = self.store.set_best_score(score) {
                warn!(error = %err, "failed to store best score");
            }
        }

        let terminated = self.game.is_game_terminated();
        let stored = if terminated {
            self.store.clear_state()
        } else {
            self.store.save_state(&self.game.serialize())
        };
        if let Err(err) = stored {
            warn!(error = %err, terminated, "failed to update saved session");
        }

        let meta = ActuateMeta {
            score,
            over: self.game.over(),
            won: self.game.won(),
            best_score: self.store.best_score().max(score),
            terminated,
        };
        self.presenter.actuate(&self.game.grid().serialize(), &meta, delta);
    }

    /// Raw attestation snapshot, always available
    pub fn prover_data(&self) -> ProverData {
        self.game.prover_data()
    }

    /// Attestation data for a finished, untampered session.
    ///
    /// Requires a terminated session with at least one move and a positive
    /// score, a live state that passes validation, agreement with any state
    /// still held by the store, and a history that fits the circuit.
    pub fn export_prover_data(&mut self) -> Result<ProverData, ExportError> {
        if !self.game.is_game_terminated() {
            return Err(ExportError::NotTerminated);
        }
        if self.game.moves_history().is_empty() {
            return Err(ExportError::NoMoves);
        }
        if self.game.score() == 0 {
            return Err(ExportError::NoScore);
        }

        let current: SavedState = self.game.serialize();
        current.validate(self.game.size())?;

        if let Some(stored) = self.store.load_state()? {
            if stored != current {
                return Err(ExportError::StateMismatch);
            }
        }

        let data = self.game.prover_data();
        if data.moves.len() > MAX_CIRCUIT_MOVES {
            return Err(ExportError::TooManyMovesForCircuit {
                moves: data.moves.len(),
                limit: MAX_CIRCUIT_MOVES,
            });
        }
        Ok(data)
    }

    /// Checked attestation data with the move list padded to the circuit length
    pub fn export_circuit_input(&mut self) -> Result<CircuitInput, ExportError> {
        let data = self.export_prover_data()?;
        let moves = data.moves.len();
        data.circuit_input(MAX_CIRCUIT_MOVES)
            .ok_or(ExportError::TooManyMovesForCircuit {
                moves,
                limit: MAX_CIRCUIT_MOVES,
            })
    }

    /// Write the prover file at `path`.
    ///
    /// Nothing is written unless [`export_circuit_input`](Self::export_circuit_input)
    /// succeeds.
    pub fn write_prover_file(&mut self, path: &Path) -> Result<CircuitInput, ExportError> {
        let input = self.export_circuit_input()?;
        let json = serde_json::to_string_pretty(&input)?;
        fs::write(path, json)?;
        info!(path = %path.display(), moves = input.data.total_moves, "prover data saved");
        Ok(input)
    }

    pub fn best_score(&self) -> u32 {
        self.store.best_score()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn game(&self) -> &GameManager {
        &self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_parts(self) -> (GameManager, S, P) {
        (self.game, self.store, self.presenter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridSnapshot;
    use crate::presenter::NullPresenter;
    use crate::store::MemoryStore;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(GridSnapshot, ActuateMeta, bool)>,
        continues: usize,
    }

    impl Presenter for Recorder {
        fn actuate(&mut self, grid: &GridSnapshot, meta: &ActuateMeta, delta: Option<&TurnDelta>) {
            self.frames.push((grid.clone(), *meta, delta.is_some()));
        }

        fn continue_game(&mut self) {
            self.continues += 1;
        }
    }

    #[test]
    fn test_setup_actuates_and_persists() {
        let session = Session::new(EngineConfig::default(), MemoryStore::new(), Recorder::default());
        assert_eq!(session.presenter().frames.len(), 1);
        let (_, meta, had_delta) = &session.presenter().frames[0];
        assert!(!had_delta);
        assert!(!meta.terminated);
        assert_eq!(session.store().state(), Some(&session.game().serialize()));
    }

    #[test]
    fn test_restart_clears_and_notifies() {
        let mut session = Session::new(EngineConfig::default(), MemoryStore::new(), Recorder::default());
        session.restart();
        assert_eq!(session.presenter().continues, 1);
        assert_eq!(session.presenter().frames.len(), 2);
        assert!(session.game().moves_history().is_empty());
    }

    #[test]
    fn test_export_requires_terminated_session() {
        let mut session = Session::new(EngineConfig::default(), MemoryStore::new(), NullPresenter);
        assert!(matches!(
            session.export_prover_data(),
            Err(ExportError::NotTerminated)
        ));
    }
}
