use core::fmt::Debug;

use crate::rng::{self, SplitMix64};

/// Stable identifier for an agent.
///
/// Deterministic simulation requires stable ordering (`Ord`) and a stable
/// numeric id (`stable_id`) for seeding and logs.
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Per-tick context threaded explicitly through every tick call.
///
/// There is no global simulation state: everything an agent or process may
/// consult is passed in by reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    /// Generator owned by one agent and one logical stream.
    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        SplitMix64::new(rng::derive_seed(self.seed, agent.stable_id(), stream))
    }

    /// Generator for a world-level process not owned by any agent.
    ///
    /// The current tick is mixed in, so each tick draws from a fresh,
    /// reproducible sequence.
    pub fn rng_for_stream(&self, stream: u64) -> SplitMix64 {
        SplitMix64::new(rng::derive_seed(self.seed, self.tick, stream))
    }
}
