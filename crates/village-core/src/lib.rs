//! Deterministic kernel primitives for the village simulation.

#![forbid(unsafe_code)]

pub mod rng;
pub mod tick;
pub mod trace;

pub use rng::{DeterministicRng, SplitMix64};
pub use tick::{AgentId, TickContext};
pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
