//! Game manager module - the session state machine
//!
//! Ties together the grid, the spawn RNG and turn resolution. A session is
//! *active* until it becomes *terminated* (`over`, or `won` without
//! `keep_playing`); while terminated every move is ignored. `restart` always
//! returns to a fresh active session.

use tracing::{debug, info};

use crate::grid::Grid;
use crate::prover::ProverData;
use crate::rng::SimpleRng;
use crate::snapshot::{SavedState, StateError};
use crate::tile::Tile;
use crate::turn::{resolve_turn, TurnDelta};
use crate::types::{Direction, START_TILES};

/// What a single `apply_move` call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The session is terminated; nothing changed.
    Ignored,
    /// No tile could move in that direction; the turn was discarded.
    Unchanged,
    /// The grid changed, the move was recorded and a tile spawned.
    Applied(TurnReport),
}

impl TurnOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TurnOutcome::Applied(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub direction: Direction,
    pub delta: TurnDelta,
    pub score_gained: u32,
    pub won: bool,
    pub over: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameManager {
    size: usize,
    grid: Grid,
    score: u32,
    over: bool,
    won: bool,
    keep_playing: bool,
    moves_history: Vec<Direction>,
    rng: SimpleRng,
}

impl GameManager {
    /// Fresh session with the starting tiles already spawned
    pub fn new(size: usize, seed: u32) -> Self {
        let mut game = Self::blank(size, SimpleRng::new(seed));
        game.add_start_tiles();
        game
    }

    /// Session over a prepared grid, with zero score and no history.
    ///
    /// The grid is not validated. Tile values past `MAX_TILE_VALUE` are
    /// playable, but such a session fails validation once serialized.
    pub fn from_grid(grid: Grid, seed: u32) -> Self {
        let mut game = Self::blank(grid.size(), SimpleRng::new(seed));
        game.grid = grid;
        game
    }

    /// Rebuild a session from external persistence.
    ///
    /// The saved state is validated first; tile identities are fresh. The spawn
    /// stream resumes from the saved RNG state, or starts from `seed` when the
    /// document carries none.
    pub fn restore(saved: &SavedState, size: usize, seed: u32) -> Result<Self, StateError> {
        saved.validate(size)?;

        let rng = saved
            .rng_state
            .map_or_else(|| SimpleRng::new(seed), SimpleRng::from_state);
        let mut game = Self::blank(size, rng);
        game.grid = Grid::from_state(&saved.grid);
        game.score = saved.score as u32;
        game.over = saved.over;
        game.won = saved.won;
        game.keep_playing = saved.keep_playing;
        game.moves_history = saved
            .moves_history
            .iter()
            .filter_map(|&code| Direction::from_code(code))
            .collect();
        Ok(game)
    }

    fn blank(size: usize, rng: SimpleRng) -> Self {
        Self {
            size,
            grid: Grid::new(size),
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
            moves_history: Vec::new(),
            rng,
        }
    }

    /// Reset to a fresh session. The spawn stream continues rather than reseeding.
    pub fn restart(&mut self) {
        let rng = self.rng.clone();
        *self = Self::blank(self.size, rng);
        self.add_start_tiles();
        info!(size = self.size, "session restarted");
    }

    /// Allow play past a win
    pub fn continue_playing(&mut self) {
        self.keep_playing = true;
    }

    pub fn is_game_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    /// An empty cell exists or two adjacent tiles share a value
    pub fn moves_available(&self) -> bool {
        self.grid.cells_available() || self.grid.tile_matches_available()
    }

    fn add_start_tiles(&mut self) {
        for _ in 0..START_TILES {
            self.add_random_tile();
        }
    }

    /// Spawn a 2 (90%) or 4 (10%) on a uniformly chosen empty cell
    pub fn add_random_tile(&mut self) -> Option<Tile> {
        if !self.grid.cells_available() {
            return None;
        }
        let value = self.rng.spawn_value();
        let cell = self.grid.random_available_cell(&mut self.rng)?;
        let tile = Tile::new(cell, value);
        self.grid.insert_tile(tile.clone());
        Some(tile)
    }

    /// Play one turn in `direction`.
    pub fn apply_move(&mut self, direction: Direction) -> TurnOutcome {
        if self.is_game_terminated() {
            return TurnOutcome::Ignored;
        }

        let resolution = resolve_turn(&self.grid, direction);
        if !resolution.moved {
            return TurnOutcome::Unchanged;
        }

        let was_won = self.won;
        self.grid = resolution.grid;
        self.score = self.score.saturating_add(resolution.score_gained);
        self.won |= resolution.reached_win;
        self.moves_history.push(direction);

        let mut delta = resolution.delta;
        delta.spawned = self.add_random_tile();

        if !self.moves_available() {
            self.over = true;
        }

        debug!(
            direction = direction.as_str(),
            gained = resolution.score_gained,
            score = self.score,
            "turn applied"
        );
        if self.won && !was_won {
            info!(score = self.score, moves = self.moves_history.len(), "reached winning tile");
        }
        if self.over {
            info!(score = self.score, moves = self.moves_history.len(), "game over");
        }

        TurnOutcome::Applied(TurnReport {
            direction,
            delta,
            score_gained: resolution.score_gained,
            won: self.won,
            over: self.over,
        })
    }

    /// Persisted form of the whole session
    pub fn serialize(&self) -> SavedState {
        SavedState {
            grid: self.grid.serialize(),
            score: self.score as i64,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
            moves_history: self.moves_history.iter().map(|d| d.code() as i64).collect(),
            rng_state: Some(self.rng.state()),
        }
    }

    pub fn prover_data(&self) -> ProverData {
        ProverData::new(self.score, self.moves_history.iter().map(Direction::code).collect())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn over(&self) -> bool {
        self.over
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn keep_playing(&self) -> bool {
        self.keep_playing
    }

    pub fn moves_history(&self) -> &[Direction] {
        &self.moves_history
    }

    /// Spawn RNG state (for resuming the same stream)
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_GRID_SIZE, 1)
    }
}
