//! Deterministic random number generator
//!
//! Uses a simple xorshift64 algorithm so a seeded level places randomly
//! spawned actors identically on every run.

use serde::{Deserialize, Serialize};

/// A deterministic random number generator
///
/// Never use a non-deterministic source for placement decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RngState")]
pub struct GameRng {
    state: u64,
}

/// Saved form of [`GameRng`]; loading goes through `GameRng::new`
#[derive(Deserialize)]
struct RngState {
    state: u64,
}

impl From<RngState> for GameRng {
    fn from(saved: RngState) -> Self {
        Self::new(saved.state)
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves a zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Get the current state (useful for saving/loading)
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random f64 in range [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a random f64 in range [min, max)
    ///
    /// Returns `min` when the range is empty.
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + self.next_f64() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}
