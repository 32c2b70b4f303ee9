use village_bt::{BtHost, BtStatus};
use village_core::{AgentId, TickContext, TraceEvent, TraceLog};

use crate::actions::Action;
use crate::conditions::Condition;
use crate::config::SimConfig;
use crate::economy::Global;
use crate::villager::{Villager, VillagerId};
use crate::world::World;

/// Borrowed view of the simulation handed to one behavior tree tick.
///
/// Conditions read through it, actions mutate through it. Built fresh per
/// villager per tick by the orchestrator, so borrows never outlive the tick.
pub struct SimHost<'a> {
    pub cfg: &'a SimConfig,
    pub world: &'a mut World,
    pub global: &'a mut Global,
    pub villagers: &'a mut [Villager],
    pub trace: &'a mut TraceLog,
}

impl BtHost for SimHost<'_> {
    type Agent = VillagerId;
    type Condition = Condition;
    type Action = Action;

    fn check(&mut self, _ctx: &TickContext, agent: VillagerId, condition: &Condition) -> bool {
        let Some(v) = self.villagers.get(agent.index()) else {
            return false;
        };
        condition.eval(v, self.world, self.global, self.cfg)
    }

    fn perform(&mut self, ctx: &TickContext, agent: VillagerId, action: &Action) -> BtStatus {
        let me = agent.index();
        if me >= self.villagers.len() {
            return BtStatus::Failure;
        }
        let status = action.perform(ctx, self.cfg, me, self.villagers, self.world, self.global);
        if status.is_terminal() {
            let success = status == BtStatus::Success;
            if success {
                self.villagers[me].last_failure = None;
            }
            self.trace.push(
                TraceEvent::new(ctx.tick, action.name())
                    .with_a(agent.stable_id())
                    .with_b(success as u64),
            );
        }
        status
    }
}
