use serde::{Deserialize, Serialize};
use village_bt::BtStatus;
use village_core::{AgentId, TickContext};

use crate::actions::Action;
use crate::config::SimConfig;
use crate::economy::ItemKind;
use crate::math::Vec2;
use crate::world::World;

/// Stable villager identity; doubles as the index into the villager list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VillagerId(pub u32);

impl VillagerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl AgentId for VillagerId {
    fn stable_id(self) -> u64 {
        self.0 as u64
    }
}

/// Advisory role tag. Nothing enforces it; it only picks the default tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Farmer,
    Baker,
    Lumberjack,
    Shepherd,
    Fisher,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Baker => "baker",
            Role::Lumberjack => "lumberjack",
            Role::Shepherd => "shepherd",
            Role::Fisher => "fisher",
        }
    }
}

/// Visual state tag, read by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Idle,
    Walking,
    Working,
    Sleeping,
}

/// Currently targeted resources, read by other villagers' finders to steer
/// them toward unclaimed work. Advisory only — never a lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub field: Option<usize>,
    pub tree: Option<usize>,
    pub sheep: Option<usize>,
}

// Serialize only: `name` is a static label, not round-tripped state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Villager {
    pub id: VillagerId,
    pub name: &'static str,
    pub role: Role,
    pub pos: Vec2,
    pub spawn: Vec2,

    pub energy: f32,
    pub hunger: f32,
    pub warmth: f32,

    /// Single inventory slot: at most one kind at a time.
    pub inventory: Option<(ItemKind, u32)>,
    pub wearing_sweater: bool,
    pub has_water: bool,

    pub activity: Activity,
    pub claim: Claims,

    /// Progress of the multi-tick action currently being worked, if any.
    pub progress: f32,
    progress_tag: Option<Action>,

    /// Why the most recent action refused to run. Diagnostics only.
    pub last_failure: Option<&'static str>,
}

impl Villager {
    pub fn new(id: VillagerId, name: &'static str, role: Role, spawn: Vec2) -> Self {
        Self {
            id,
            name,
            role,
            pos: spawn,
            spawn,
            energy: 100.0,
            hunger: 100.0,
            warmth: 70.0,
            inventory: None,
            wearing_sweater: false,
            has_water: false,
            activity: Activity::Idle,
            claim: Claims::default(),
            progress: 0.0,
            progress_tag: None,
            last_failure: None,
        }
    }

    pub fn is_near(&self, p: Vec2, cfg: &SimConfig) -> bool {
        self.pos.distance(p) <= cfg.near_radius
    }

    pub fn carrying(&self, kind: ItemKind) -> u32 {
        match self.inventory {
            Some((k, n)) if k == kind => n,
            _ => 0,
        }
    }

    /// Add to the single slot. Fails when already carrying a different kind.
    pub fn try_carry(&mut self, kind: ItemKind, count: u32) -> bool {
        match &mut self.inventory {
            None => {
                self.inventory = Some((kind, count));
                true
            }
            Some((k, n)) if *k == kind => {
                *n += count;
                true
            }
            Some(_) => false,
        }
    }

    /// Refuse an action: record the reason and report `Failure`.
    ///
    /// Precondition misses are steady-state behavior, not errors; any
    /// in-flight progress is abandoned so the tree can re-route cleanly.
    pub fn deny(&mut self, reason: &'static str) -> BtStatus {
        self.last_failure = Some(reason);
        self.progress = 0.0;
        self.progress_tag = None;
        self.activity = Activity::Idle;
        BtStatus::Failure
    }

    /// Accumulate progress on a multi-tick action. Starting a different
    /// action discards the previous counter. Returns `true` on the tick the
    /// duration is reached.
    pub fn make_progress(&mut self, action: Action, duration: f32, dt: f32) -> bool {
        if self.progress_tag != Some(action) {
            self.progress_tag = Some(action);
            self.progress = 0.0;
        }
        self.activity = Activity::Working;
        self.progress += dt;
        if self.progress >= duration {
            self.finish_progress();
            true
        } else {
            false
        }
    }

    pub fn finish_progress(&mut self) {
        self.progress = 0.0;
        self.progress_tag = None;
    }

    pub fn spend_energy(&mut self, amount: f32) {
        self.energy = (self.energy - amount).max(0.0);
    }

    /// Greedy wall-avoiding step toward `target`, shared by every "go to"
    /// action.
    ///
    /// Walks toward the routing waypoint (the target itself, or a door or
    /// gate when a wall lies between). Attempts, in order: the direct step
    /// (diagonals must not cut a blocked corner), axis-separated movement
    /// (larger remaining axis first), then a four-directional wall-follow
    /// ranked by resulting distance. With no valid candidate the villager
    /// stays put and the action stays `Running`; the obstruction may be
    /// transient.
    pub fn advance_toward(
        &mut self,
        world: &World,
        cfg: &SimConfig,
        ctx: &TickContext,
        target: Vec2,
    ) -> BtStatus {
        let dist = self.pos.distance(target);
        if dist <= cfg.arrival_epsilon {
            self.activity = Activity::Idle;
            return BtStatus::Success;
        }

        let goal = world.route_waypoint(cfg, self.pos, target);
        let aim = goal - self.pos;

        let mut step = cfg.walk_speed * ctx.dt_seconds;
        if self.hunger < cfg.slowdown_threshold || self.warmth < cfg.slowdown_threshold {
            step *= cfg.slowdown_factor;
        }
        let step = step.min(aim.length());
        let dir = aim.normalized_or_zero();

        let next = self
            .direct_step(world, cfg, dir, step)
            .or_else(|| self.axis_step(world, cfg, aim, step))
            .or_else(|| self.wall_follow_step(world, cfg, goal, step));

        match next {
            Some(next) => {
                let moved = self.pos.distance(next);
                self.pos = next;
                self.activity = Activity::Walking;
                self.spend_energy(cfg.move_energy_cost * moved);
                BtStatus::Running
            }
            None => BtStatus::Running,
        }
    }

    fn direct_step(&self, world: &World, cfg: &SimConfig, dir: Vec2, step: f32) -> Option<Vec2> {
        let next = self.pos + dir * step;
        if world.is_blocked(cfg, next) {
            return None;
        }
        // A diagonal step must not slip through a wall corner: both tiles the
        // diagonal cuts across have to be free.
        let diagonal = dir.x.abs() > f32::EPSILON && dir.y.abs() > f32::EPSILON;
        if diagonal {
            let across_x = Vec2::new(next.x, self.pos.y);
            let across_y = Vec2::new(self.pos.x, next.y);
            if world.is_blocked(cfg, across_x) || world.is_blocked(cfg, across_y) {
                return None;
            }
        }
        Some(next)
    }

    fn axis_step(&self, world: &World, cfg: &SimConfig, to: Vec2, step: f32) -> Option<Vec2> {
        let x_move = Vec2::new(self.pos.x + to.x.signum() * step.min(to.x.abs()), self.pos.y);
        let y_move = Vec2::new(self.pos.x, self.pos.y + to.y.signum() * step.min(to.y.abs()));

        let (first, second) = if to.x.abs() >= to.y.abs() {
            (x_move, y_move)
        } else {
            (y_move, x_move)
        };

        for candidate in [first, second] {
            if candidate.distance(self.pos) > f32::EPSILON && !world.is_blocked(cfg, candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn wall_follow_step(
        &self,
        world: &World,
        cfg: &SimConfig,
        target: Vec2,
        step: f32,
    ) -> Option<Vec2> {
        let mut candidates = [
            Vec2::new(self.pos.x, self.pos.y - step),
            Vec2::new(self.pos.x + step, self.pos.y),
            Vec2::new(self.pos.x, self.pos.y + step),
            Vec2::new(self.pos.x - step, self.pos.y),
        ];
        candidates.sort_by(|a, b| {
            a.distance(target)
                .partial_cmp(&b.distance(target))
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        candidates
            .into_iter()
            .find(|&c| !world.is_blocked(cfg, c))
    }

    /// Per-tick vital drain and warmth drift, applied by the orchestrator.
    pub fn apply_drain(&mut self, cfg: &SimConfig, ambient: f32, near_lit_fire: bool, dt: f32) {
        self.energy = (self.energy - cfg.energy_drain * dt).max(0.0);
        self.hunger = (self.hunger - cfg.hunger_drain * dt).max(0.0);

        let mut toward = ambient;
        if self.wearing_sweater {
            toward += cfg.sweater_bonus;
        }
        if near_lit_fire {
            toward = toward.max(cfg.fireplace_warmth);
        }
        let pull = (cfg.warmth_drift * dt).min(1.0);
        self.warmth += (toward - self.warmth) * pull;
        self.warmth = self.warmth.clamp(0.0, 100.0);
    }

    /// Reset to the initial state at the spawn position.
    pub fn reset(&mut self) {
        *self = Villager::new(self.id, self.name, self.role, self.spawn);
    }
}
