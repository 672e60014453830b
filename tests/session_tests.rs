//! Session tests - persistence contract, presenter notifications, export gating

use zk2048::core::{GameManager, Grid, GridSnapshot, SavedState, TileSnapshot, TurnDelta, TurnOutcome};
use zk2048::engine::{
    ActuateMeta, EngineConfig, ExportError, JsonFileStore, MemoryStore, NullPresenter, Presenter,
    Session, StateStore,
};
use zk2048::types::{Direction, MAX_CIRCUIT_MOVES};

#[derive(Default)]
struct RecordingPresenter {
    metas: Vec<ActuateMeta>,
    deltas: Vec<bool>,
    continues: usize,
}

impl Presenter for RecordingPresenter {
    fn actuate(&mut self, _grid: &GridSnapshot, meta: &ActuateMeta, delta: Option<&TurnDelta>) {
        self.metas.push(*meta);
        self.deltas.push(delta.is_some());
    }

    fn continue_game(&mut self) {
        self.continues += 1;
    }
}

fn saved_from_rows(rows: &[&[u32]]) -> SavedState {
    GameManager::from_grid(Grid::from_rows(rows), 1).serialize()
}

fn near_win() -> SavedState {
    saved_from_rows(&[&[1024, 1024, 0, 0], &[0; 4], &[0; 4], &[0; 4]])
}

#[test]
fn test_fresh_session_without_saved_state() {
    let session = Session::new(EngineConfig::default(), MemoryStore::new(), RecordingPresenter::default());
    let game = session.game();
    assert_eq!(game.grid().tiles().count(), 2);
    assert_eq!(game.score(), 0);
    assert_eq!(session.presenter().metas.len(), 1);
    assert_eq!(session.presenter().deltas, vec![false]);
}

#[test]
fn test_valid_saved_state_is_restored() {
    let mut saved = saved_from_rows(&[&[2, 0, 0, 0], &[0, 4, 0, 0], &[0; 4], &[0, 0, 0, 8]]);
    saved.score = 128;
    saved.moves_history = vec![0, 1, 2, 3];

    let session = Session::new(EngineConfig::default(), MemoryStore::with_state(saved.clone()), NullPresenter);
    assert_eq!(session.game().serialize(), saved);
    assert_eq!(session.game().score(), 128);
    assert_eq!(
        session.game().moves_history(),
        &[Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    );
}

#[test]
fn test_tampered_saved_state_starts_fresh() {
    let mut saved = saved_from_rows(&[&[2, 0, 0, 0], &[0; 4], &[0; 4], &[0; 4]]);
    saved.grid.cells[0][0] = Some(TileSnapshot::new(0, 0, 3));
    saved.score = 50;

    let session = Session::new(EngineConfig::default(), MemoryStore::with_state(saved.clone()), NullPresenter);
    assert_eq!(session.game().score(), 0);
    assert!(session.game().moves_history().is_empty());
    // The rejected state was replaced by the fresh session
    assert_ne!(session.store().state(), Some(&saved));
}

#[test]
fn test_wrong_size_saved_state_starts_fresh() {
    let saved = saved_from_rows(&[&[2, 0, 0], &[0; 3], &[0; 3]]);
    let session = Session::new(EngineConfig::default(), MemoryStore::with_state(saved), NullPresenter);
    assert_eq!(session.game().size(), 4);
    assert_eq!(session.game().grid().tiles().count(), 2);
}

#[test]
fn test_accepted_turn_persists_and_notifies() {
    let mut session = Session::new(
        EngineConfig::default(),
        MemoryStore::with_state(saved_from_rows(&[&[2, 2, 0, 0], &[0; 4], &[0; 4], &[0; 4]])),
        RecordingPresenter::default(),
    );

    assert!(session.move_in(Direction::Left).is_applied());
    assert_eq!(session.store().state(), Some(&session.game().serialize()));
    assert_eq!(session.best_score(), 4);

    let presenter = session.presenter();
    assert_eq!(presenter.deltas, vec![false, true]);
    let last = presenter.metas.last().unwrap();
    assert_eq!(last.score, 4);
    assert_eq!(last.best_score, 4);
    assert!(!last.terminated);
}

#[test]
fn test_unchanged_turn_does_not_notify() {
    let mut session = Session::new(
        EngineConfig::default(),
        MemoryStore::with_state(saved_from_rows(&[&[2, 4, 0, 0], &[0; 4], &[0; 4], &[0; 4]])),
        RecordingPresenter::default(),
    );
    assert_eq!(session.move_in(Direction::Left), TurnOutcome::Unchanged);
    assert_eq!(session.presenter().metas.len(), 1);
}

#[test]
fn test_win_clears_stored_state_and_continue_resumes() {
    let mut session = Session::new(
        EngineConfig::default(),
        MemoryStore::with_state(near_win()),
        RecordingPresenter::default(),
    );

    session.move_in(Direction::Right);
    assert!(session.game().won());
    assert!(session.game().is_game_terminated());
    assert!(session.store().state().is_none());
    assert!(session.presenter().metas.last().unwrap().terminated);

    session.continue_playing();
    assert_eq!(session.presenter().continues, 1);
    assert!(!session.game().is_game_terminated());

    let moved = Direction::ALL.iter().any(|&d| session.move_in(d).is_applied());
    assert!(moved);
    assert!(session.store().state().is_some());
    assert!(session.game().won());
}

#[test]
fn test_restart_clears_store_and_resets() {
    let mut session = Session::new(
        EngineConfig::default(),
        MemoryStore::with_state(near_win()),
        RecordingPresenter::default(),
    );
    session.move_in(Direction::Right);
    let best = session.best_score();

    session.restart();
    assert!(!session.game().won());
    assert_eq!(session.game().score(), 0);
    assert_eq!(session.presenter().continues, 1);
    // Best score survives a restart
    assert_eq!(session.best_score(), best);
    assert_eq!(session.store().state(), Some(&session.game().serialize()));
}

#[test]
fn test_export_gating() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new(), NullPresenter);
    assert!(matches!(session.export_prover_data(), Err(ExportError::NotTerminated)));

    let mut session = Session::new(
        EngineConfig::default(),
        MemoryStore::with_state(near_win()),
        NullPresenter,
    );
    session.move_in(Direction::Right);
    let data = session.export_prover_data().unwrap();
    assert_eq!(data.final_score, 2048);
    assert_eq!(data.moves, vec![1]);
    assert_eq!(data.padded_moves(MAX_CIRCUIT_MOVES).unwrap().len(), MAX_CIRCUIT_MOVES);
}

#[test]
fn test_export_rejects_zero_score_and_empty_history() {
    // Terminated on load with no moves recorded
    let mut saved = near_win();
    saved.won = true;
    let mut session = Session::new(EngineConfig::default(), MemoryStore::with_state(saved), NullPresenter);
    assert!(matches!(session.export_prover_data(), Err(ExportError::NoMoves)));

    let mut saved = near_win();
    saved.won = true;
    saved.moves_history = vec![3];
    let mut session = Session::new(EngineConfig::default(), MemoryStore::with_state(saved), NullPresenter);
    assert!(matches!(session.export_prover_data(), Err(ExportError::NoScore)));
}

/// Store that keeps returning a stale session no matter what is saved
struct StaleStore(SavedState);

impl StateStore for StaleStore {
    fn load_state(&mut self) -> Result<Option<SavedState>, zk2048::engine::StoreError> {
        Ok(Some(self.0.clone()))
    }
    fn save_state(&mut self, _state: &SavedState) -> Result<(), zk2048::engine::StoreError> {
        Ok(())
    }
    fn clear_state(&mut self) -> Result<(), zk2048::engine::StoreError> {
        Ok(())
    }
    fn best_score(&self) -> u32 {
        0
    }
    fn set_best_score(&mut self, _score: u32) -> Result<(), zk2048::engine::StoreError> {
        Ok(())
    }
}

#[test]
fn test_export_detects_store_mismatch() {
    let mut session = Session::new(EngineConfig::default(), StaleStore(near_win()), NullPresenter);
    session.move_in(Direction::Right);
    assert!(session.game().is_game_terminated());
    assert!(matches!(session.export_prover_data(), Err(ExportError::StateMismatch)));
}

#[test]
fn test_file_store_session_resume() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        state_dir: Some(dir.path().to_path_buf()),
        ..EngineConfig::default()
    };

    let mut session = Session::new(config.clone(), JsonFileStore::open(dir.path()).unwrap(), NullPresenter);
    for direction in [Direction::Left, Direction::Down, Direction::Right] {
        session.move_in(direction);
    }
    let (game, _, _) = session.into_parts();

    let resumed = Session::new(config, JsonFileStore::open(dir.path()).unwrap(), NullPresenter);
    assert_eq!(resumed.game().serialize(), game.serialize());
}

#[test]
fn test_corrupt_file_store_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("game_state.json"), "{\"grid\": 7").unwrap();

    let session = Session::new(EngineConfig::default(), JsonFileStore::open(dir.path()).unwrap(), NullPresenter);
    assert_eq!(session.game().score(), 0);
    assert_eq!(session.game().grid().tiles().count(), 2);
}

#[test]
fn test_unfinished_session_writes_no_prover_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game_prover_data.json");

    let mut session = Session::new(EngineConfig::default(), MemoryStore::new(), NullPresenter);
    session.move_in(Direction::Left);
    session.move_in(Direction::Down);

    assert!(matches!(session.write_prover_file(&path), Err(ExportError::NotTerminated)));
    assert!(!path.exists());
}

#[test]
fn test_finished_session_writes_padded_prover_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game_prover_data.json");

    let mut session = Session::new(EngineConfig::default(), MemoryStore::with_state(near_win()), NullPresenter);
    session.move_in(Direction::Right);
    let input = session.write_prover_file(&path).unwrap();
    assert_eq!(input.padded_moves.len(), MAX_CIRCUIT_MOVES);

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["final_score"], 2048);
    assert_eq!(written["total_moves"], 1);
    assert_eq!(written["moves"], serde_json::json!([1]));
    let padded = written["padded_moves"].as_array().unwrap();
    assert_eq!(padded.len(), MAX_CIRCUIT_MOVES);
    assert_eq!(padded[0], 1);
    assert!(padded[1..].iter().all(|m| m == 0));
}

#[test]
fn test_resumed_session_replays_same_spawns() {
    let moves = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];
    let config = EngineConfig::default();

    let mut straight = Session::new(config.clone(), MemoryStore::new(), NullPresenter);
    for dir in moves {
        straight.move_in(dir);
    }

    let mut interrupted = Session::new(config.clone(), MemoryStore::new(), NullPresenter);
    for dir in &moves[..3] {
        interrupted.move_in(*dir);
    }
    let (_, store, _) = interrupted.into_parts();
    let mut resumed = Session::new(config, store, NullPresenter);
    assert_eq!(resumed.config().seed, 1);
    for dir in &moves[3..] {
        resumed.move_in(*dir);
    }

    assert_eq!(resumed.game().grid().to_rows(), straight.game().grid().to_rows());
    assert_eq!(resumed.game().serialize(), straight.game().serialize());
}

#[test]
fn test_edited_state_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(EngineConfig::default(), JsonFileStore::open(dir.path()).unwrap(), NullPresenter);
    session.move_in(Direction::Left);
    drop(session);

    let path = dir.path().join("game_state.json");
    let text = std::fs::read_to_string(&path).unwrap();
    let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    doc["state"]["score"] = serde_json::json!(500_000);
    doc["state"]["movesHistory"] = serde_json::json!([3, 3, 3]);
    std::fs::write(&path, doc.to_string()).unwrap();

    let session = Session::new(EngineConfig::default(), JsonFileStore::open(dir.path()).unwrap(), NullPresenter);
    assert_eq!(session.game().score(), 0);
    assert!(session.game().moves_history().is_empty());
}
