//! Lane randomness source.
//!
//! One draw per RANDOM gate, in program order. The generator is an explicit
//! object owned by the evaluator, so two evaluators never share random state
//! and a seeded run replays bit for bit.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Seedable random word generator for RANDOM gates.
#[derive(Clone, Debug)]
pub struct LaneRng {
    rng: ChaCha12Rng,
    enabled: bool,
}

impl LaneRng {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        LaneRng {
            rng: ChaCha12Rng::from_entropy(),
            enabled: true,
        }
    }

    /// Deterministic generator
    pub fn seeded(seed: u64) -> Self {
        LaneRng {
            rng: ChaCha12Rng::seed_from_u64(seed),
            enabled: true,
        }
    }

    /// Restart the stream from a new seed
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// When disabled, every draw is zero. Used to make traced runs of
    /// masked circuits reproducible without touching the circuit.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Next full-width word: two independent 32-bit draws, low half first
    pub fn next_word(&mut self) -> u64 {
        if !self.enabled {
            return 0;
        }
        let lo = self.rng.next_u32() as u64;
        let hi = self.rng.next_u32() as u64;
        lo | (hi << 32)
    }
}

impl Default for LaneRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
