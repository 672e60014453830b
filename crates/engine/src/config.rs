//! Engine configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::types::DEFAULT_GRID_SIZE;

/// Accepted board sizes
const MIN_GRID_SIZE: usize = 2;
const MAX_GRID_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub size: usize,
    pub seed: u32,
    /// Directory for the JSON file store; in-memory storage when unset
    pub state_dir: Option<PathBuf>,
    /// Where to write prover data at the end of a run
    pub prover_out: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            seed: 1,
            state_dir: None,
            prover_out: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    ///
    /// - `ZK2048_SIZE`: board size (default 4, accepted 2..=16)
    /// - `ZK2048_SEED`: spawn RNG seed (default 1)
    /// - `ZK2048_STATE_DIR`: directory for persisted state (optional)
    /// - `ZK2048_PROVER_OUT`: path for the prover JSON (optional)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let size = lookup("ZK2048_SIZE")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(n))
            .unwrap_or(defaults.size);

        let seed = lookup("ZK2048_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let path = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
        };

        Self {
            size,
            seed,
            state_dir: path("ZK2048_STATE_DIR"),
            prover_out: path("ZK2048_PROVER_OUT"),
        }
    }
}
