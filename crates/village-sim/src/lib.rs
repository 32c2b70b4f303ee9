//! Village world, villagers, and the behavior-tree driven simulation loop.
//!
//! A fixed-step, single-threaded, cooperative simulation: one [`Simulation::step`]
//! advances the clock and natural world processes once, then ticks every
//! villager's behavior tree exactly once in stable id order. Shared state
//! (world collections, the global economy) is only ever mutated from that one
//! call path, so `Running` statuses are cooperative multi-tasking across
//! ticks, never concurrency.

#![forbid(unsafe_code)]

pub mod actions;
pub mod clock;
pub mod conditions;
pub mod config;
pub mod economy;
pub mod host;
pub mod math;
pub mod sim;
pub mod trees;
pub mod villager;
pub mod world;

pub use actions::Action;
pub use clock::Clock;
pub use conditions::Condition;
pub use config::{ConfigError, SimConfig};
pub use economy::{Global, ItemKind, Season};
pub use host::SimHost;
pub use math::{Rect, Vec2};
pub use sim::{Brain, Objectives, Simulation};
pub use villager::{Activity, Role, Villager, VillagerId};
pub use world::{
    Building, BuildingKind, DoorSide, Field, FieldState, FireOutbreak, Sheep, TreeStand,
    TreeState, World,
};

/// Logical RNG stream tags, one per stochastic process.
pub mod streams {
    pub const SHEEP_WANDER: u64 = 1;
    pub const FIRE_IGNITION: u64 = 2;
    pub const FISHING: u64 = 3;
}
