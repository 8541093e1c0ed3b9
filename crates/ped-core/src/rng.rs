//! Deterministic per-agent decision RNG.
//!
//! # Determinism strategy
//!
//! Random branch choices are made with a fresh `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT) XOR (stream * STREAM_CONSTANT)
//!
//! `stream` is a per-agent decision counter.  Every draw is therefore a pure
//! function of (seed, agent, decision number):
//!
//! - Agents never share RNG state, so evaluation order does not matter.
//! - Adding agents does not disturb the draws of existing agents.
//! - No RNG state needs to live in the agent record.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Second odd constant so agent and stream bits land in different places.
const STREAM_CONSTANT: u64 = 0xbf58_476d_1ce4_e5b9;

/// Short-lived RNG for one agent decision.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed, an agent and a
    /// decision stream number.
    pub fn new(global_seed: u64, agent: AgentId, stream: u64) -> Self {
        let seed = global_seed
            ^ agent.0.wrapping_mul(MIXING_CONSTANT)
            ^ stream.wrapping_add(1).wrapping_mul(STREAM_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Pick an index into `weights` with probability proportional to its
    /// weight.  Returns `None` if the slice is empty or all weights are zero.
    pub fn pick_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.gen_range(0..total);
        for (i, &w) in weights.iter().enumerate() {
            let w = w as u64;
            if roll < w {
                return Some(i);
            }
            roll -= w;
        }
        None
    }
}
