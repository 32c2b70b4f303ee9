use village_core::{AgentId, TickContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

impl BtStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, BtStatus::Running)
    }
}

/// Evaluation context for condition and action leaves.
///
/// The tree stores leaf payloads only; the host decides what they mean. This
/// keeps the editable tree structure decoupled from the execution vocabulary:
/// an editor can rearrange nodes without knowing how leaves evaluate, and the
/// engine can tick a tree without knowing the domain.
pub trait BtHost {
    type Agent: AgentId;
    type Condition;
    type Action;

    /// Evaluate a condition leaf. Conditions are stateless predicates over
    /// current state; they never report `Running`.
    fn check(
        &mut self,
        ctx: &TickContext,
        agent: Self::Agent,
        condition: &Self::Condition,
    ) -> bool;

    /// Perform one tick of an action leaf and report its tri-state status.
    fn perform(&mut self, ctx: &TickContext, agent: Self::Agent, action: &Self::Action)
        -> BtStatus;
}
