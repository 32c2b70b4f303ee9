use village_core::TickContext;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bt::{BtHost, BtStatus};

/// Stable node identity: a monotonic arena index.
///
/// Slots are tombstoned on removal and never reused, so a stale id held by an
/// editor can never alias a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind<C, A> {
    Selector,
    Sequence,
    Condition(C),
    Action(A),
}

impl<C, A> NodeKind<C, A> {
    pub fn is_composite(&self) -> bool {
        matches!(self, NodeKind::Selector | NodeKind::Sequence)
    }

    /// Discriminator name, for editors and trace output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Selector => "selector",
            NodeKind::Sequence => "sequence",
            NodeKind::Condition(_) => "condition",
            NodeKind::Action(_) => "action",
        }
    }
}

#[derive(Debug, Clone)]
struct Node<C, A> {
    kind: NodeKind<C, A>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Retained child index for composites; always 0 after a terminal result.
    resume: usize,
}

enum Composite {
    Selector,
    Sequence,
}

/// An arena-backed behavior tree.
///
/// Ownership is strictly tree-shaped: every node except the root has exactly
/// one parent composite. Editing operations on unknown or stale ids are
/// silent no-ops.
#[derive(Debug, Clone)]
pub struct BehaviorTree<C, A> {
    nodes: Vec<Option<Node<C, A>>>,
    root: Option<NodeId>,
}

impl<C, A> Default for BehaviorTree<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A> BehaviorTree<C, A> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn node(&self, id: NodeId) -> Option<&Node<C, A>> {
        self.nodes.get(id.index())?.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<C, A>> {
        self.nodes.get_mut(id.index())?.as_mut()
    }

    fn alloc(&mut self, kind: NodeKind<C, A>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            kind,
            parent,
            children: Vec::new(),
            resume: 0,
        }));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeKind<C, A>> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children in evaluation order. Empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Retained resume index of a composite.
    pub fn resume_index(&self, id: NodeId) -> Option<usize> {
        let node = self.node(id)?;
        node.kind.is_composite().then_some(node.resume)
    }

    /// Install a new root, discarding any existing tree.
    pub fn set_root(&mut self, kind: NodeKind<C, A>) -> NodeId {
        if let Some(old) = self.root {
            self.remove(old);
        }
        let id = self.alloc(kind, None);
        self.root = Some(id);
        id
    }

    /// Append a child under a composite. Returns `None` if the parent is
    /// missing or a leaf.
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind<C, A>) -> Option<NodeId> {
        if !self.node(parent)?.kind.is_composite() {
            return None;
        }
        let id = self.alloc(kind, Some(parent));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        self.reset();
        Some(id)
    }

    /// Insert a new sibling directly after `sibling` under the same parent.
    ///
    /// Returns `None` (without mutating the tree) for the root or an unknown
    /// id.
    pub fn insert_after(&mut self, sibling: NodeId, kind: NodeKind<C, A>) -> Option<NodeId> {
        let parent = self.parent_of(sibling)?;
        let at = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == sibling)?;
        let id = self.alloc(kind, Some(parent));
        if let Some(node) = self.node_mut(parent) {
            node.children.insert(at + 1, id);
        }
        self.reset();
        Some(id)
    }

    /// Detach and tombstone a subtree. Silent no-op on an unknown or stale
    /// id; removing the root clears the tree.
    pub fn remove(&mut self, id: NodeId) {
        if self.node(id).is_none() {
            return;
        }

        if let Some(parent) = self.parent_of(id) {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|&c| c != id);
            }
        } else if self.root == Some(id) {
            self.root = None;
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.index()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        self.reset();
    }

    /// Recursively clear all retained resume state. Idempotent.
    pub fn reset(&mut self) {
        for node in self.nodes.iter_mut().flatten() {
            node.resume = 0;
        }
    }

    fn set_resume(&mut self, id: NodeId, resume: usize) {
        if let Some(node) = self.node_mut(id) {
            node.resume = resume;
        }
    }

    fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id)?.children.get(index).copied()
    }

    /// Tick the tree once. An empty tree reports `Failure`.
    pub fn tick<H>(&mut self, ctx: &TickContext, agent: H::Agent, host: &mut H) -> BtStatus
    where
        H: BtHost<Condition = C, Action = A>,
    {
        match self.root {
            Some(root) => self.tick_node(root, ctx, agent, host),
            None => BtStatus::Failure,
        }
    }

    fn tick_node<H>(
        &mut self,
        id: NodeId,
        ctx: &TickContext,
        agent: H::Agent,
        host: &mut H,
    ) -> BtStatus
    where
        H: BtHost<Condition = C, Action = A>,
    {
        let composite = match self.node(id) {
            None => return BtStatus::Failure,
            Some(node) => match &node.kind {
                NodeKind::Condition(c) => {
                    return if host.check(ctx, agent, c) {
                        BtStatus::Success
                    } else {
                        BtStatus::Failure
                    };
                }
                NodeKind::Action(a) => return host.perform(ctx, agent, a),
                NodeKind::Selector => Composite::Selector,
                NodeKind::Sequence => Composite::Sequence,
            },
        };

        // Resume at the retained index; earlier siblings are not re-checked.
        let mut index = self.node(id).map(|n| n.resume).unwrap_or(0);
        loop {
            let Some(child) = self.child_at(id, index) else {
                break;
            };
            let status = self.tick_node(child, ctx, agent, host);
            match (&composite, status) {
                (_, BtStatus::Running) => {
                    self.set_resume(id, index);
                    return BtStatus::Running;
                }
                (Composite::Selector, BtStatus::Success) => {
                    self.set_resume(id, 0);
                    return BtStatus::Success;
                }
                (Composite::Sequence, BtStatus::Failure) => {
                    self.set_resume(id, 0);
                    return BtStatus::Failure;
                }
                _ => index += 1,
            }
        }

        self.set_resume(id, 0);
        match composite {
            Composite::Selector => BtStatus::Failure,
            Composite::Sequence => BtStatus::Success,
        }
    }
}
