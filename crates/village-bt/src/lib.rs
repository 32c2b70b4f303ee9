//! Editable behavior-tree runtime built on `village-core`.
//!
//! Trees are stored in an arena and addressed by stable [`NodeId`]s so that
//! external editors can look up, insert, and delete nodes on a live tree.
//! Composite nodes keep a retained resume index across ticks: a child that
//! returned `Running` is resumed directly on the next tick instead of
//! re-evaluating its earlier siblings.

#![forbid(unsafe_code)]

pub mod bt;
pub mod tree;

pub use bt::{BtHost, BtStatus};
pub use tree::{BehaviorTree, NodeId, NodeKind};
