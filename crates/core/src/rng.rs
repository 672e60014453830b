//! RNG module - deterministic tile spawning
//!
//! Spawns draw from a small seeded LCG so a whole session is reproducible from
//! its seed and recorded moves. Each spawn consumes exactly two draws: one for
//! the value (4 with 10% probability, else 2) and one for the cell.

use crate::types::SPAWN_FOUR_PERCENT;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Maps the full 32-bit output onto the range by multiply-shift, so the
    /// result depends on the high bits. The low bits of an LCG cycle with a
    /// short period and must not be used with `%`.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Value for a freshly spawned tile
    pub fn spawn_value(&mut self) -> u32 {
        if self.next_range(100) < SPAWN_FOUR_PERCENT {
            4
        } else {
            2
        }
    }

    /// Get the current RNG state (for resuming the same spawn stream)
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Resume a stream from a value returned by [`state`](Self::state).
    ///
    /// Unlike [`new`](Self::new) this does not remap 0, which the LCG can
    /// legitimately pass through.
    pub fn from_state(state: u32) -> Self {
        Self { state }
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
