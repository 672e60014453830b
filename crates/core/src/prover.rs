//! Attestation data handed to the external proving pipeline.
//!
//! This is a plain snapshot. Nothing here binds the move list to the score;
//! the public inputs are taken as reported.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverData {
    pub final_score: u32,
    pub total_moves: usize,
    pub actual_moves: usize,
    pub actual_score: u32,
    pub moves: Vec<u8>,
}

impl ProverData {
    pub fn new(score: u32, moves: Vec<u8>) -> Self {
        Self {
            final_score: score,
            total_moves: moves.len(),
            actual_moves: moves.len(),
            actual_score: score,
            moves,
        }
    }

    /// Moves zero-padded to the circuit's fixed array length.
    ///
    /// Returns `None` when the history does not fit.
    pub fn padded_moves(&self, len: usize) -> Option<Vec<u8>> {
        if self.moves.len() > len {
            return None;
        }
        let mut padded = self.moves.clone();
        padded.resize(len, 0);
        Some(padded)
    }

    /// Prover file contents for a circuit taking `len` moves
    pub fn circuit_input(self, len: usize) -> Option<CircuitInput> {
        let padded_moves = self.padded_moves(len)?;
        Some(CircuitInput {
            data: self,
            padded_moves,
        })
    }
}

/// What the proving pipeline reads: the attestation fields plus the
/// fixed-length move array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInput {
    #[serde(flatten)]
    pub data: ProverData,
    pub padded_moves: Vec<u8>,
}
