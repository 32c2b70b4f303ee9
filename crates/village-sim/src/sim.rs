use tracing::{info, warn};
use village_bt::{BehaviorTree, BtStatus};
use village_core::{TickContext, TraceLog};

use crate::actions::Action;
use crate::conditions::Condition;
use crate::config::SimConfig;
use crate::economy::{Global, Season};
use crate::host::SimHost;
use crate::math::Vec2;
use crate::trees::tree_for_role;
use crate::villager::{Role, Villager, VillagerId};
use crate::world::World;

/// One villager's tree plus its per-tick bookkeeping.
///
/// The tree keeps its retained resume state across ticks while `Running`; on
/// any terminal result the whole tree is reset so the next tick re-evaluates
/// priorities from the root.
pub struct Brain {
    pub agent: VillagerId,
    pub tree: BehaviorTree<Condition, Action>,
    pub last: Option<BtStatus>,
}

impl Brain {
    pub fn new(agent: VillagerId, tree: BehaviorTree<Condition, Action>) -> Self {
        Self {
            agent,
            tree,
            last: None,
        }
    }

    pub fn tick(&mut self, ctx: &TickContext, host: &mut SimHost<'_>) -> BtStatus {
        let status = self.tree.tick(ctx, self.agent, host);
        if status.is_terminal() {
            self.tree.reset();
        }
        self.last = Some(status);
        status
    }
}

/// Set-once village goals, checked after every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Objectives {
    pub survived_days: bool,
    pub bread_goal: bool,
    pub sweater_goal: bool,
    pub fish_goal: bool,
    pub survived_winter: bool,
    /// A full day passed without any villager's hunger hitting zero.
    pub all_fed_day: bool,
    pub anyone_starved: bool,
    seen_winter: bool,
    starved_today: bool,
}

impl Objectives {
    fn update(
        &mut self,
        cfg: &SimConfig,
        global: &Global,
        villagers: &[Villager],
        season: Season,
        new_day: bool,
    ) {
        if !self.survived_days && global.day >= cfg.survive_days_goal {
            self.survived_days = true;
            info!(day = global.day, "goal reached: the village survived");
        }
        if !self.bread_goal && global.totals.bread_baked >= cfg.bread_goal {
            self.bread_goal = true;
            info!(baked = global.totals.bread_baked, "goal reached: bread");
        }
        if !self.sweater_goal && global.totals.sweaters_knitted >= cfg.sweater_goal {
            self.sweater_goal = true;
            info!(knitted = global.totals.sweaters_knitted, "goal reached: sweaters");
        }
        if !self.fish_goal && global.totals.fish_cooked >= cfg.fish_goal {
            self.fish_goal = true;
            info!(cooked = global.totals.fish_cooked, "goal reached: fish");
        }

        if season == Season::Winter {
            self.seen_winter = true;
        } else if self.seen_winter && !self.survived_winter {
            self.survived_winter = true;
            info!("goal reached: a winter survived");
        }

        if let Some(v) = villagers.iter().find(|v| v.hunger <= 0.0) {
            self.starved_today = true;
            if !self.anyone_starved {
                self.anyone_starved = true;
                warn!(villager = v.name, "a villager is starving");
            }
        }
        if new_day {
            if !self.starved_today && !self.all_fed_day {
                self.all_fed_day = true;
                info!(day = global.day, "goal reached: everyone stayed fed all day");
            }
            self.starved_today = false;
        }
    }
}

/// The whole village: world, economy, villagers, and their brains.
///
/// `step` is the only way time passes. Each step advances the clock and the
/// natural world once, applies vital drains, then ticks every brain exactly
/// once in stable id order against a fresh [`SimHost`] borrow.
pub struct Simulation {
    pub cfg: SimConfig,
    pub seed: u64,
    pub tick: u64,
    pub world: World,
    pub global: Global,
    pub villagers: Vec<Villager>,
    pub brains: Vec<Brain>,
    pub trace: TraceLog,
    pub objectives: Objectives,
}

impl Simulation {
    pub fn new(cfg: SimConfig, seed: u64) -> Self {
        let roster: [(&'static str, Role, Vec2); 5] = [
            ("Alda", Role::Farmer, Vec2::new(9.0, 10.5)),
            ("Bram", Role::Baker, Vec2::new(12.0, 7.0)),
            ("Corin", Role::Lumberjack, Vec2::new(14.5, 7.5)),
            ("Dana", Role::Shepherd, Vec2::new(14.5, 10.5)),
            ("Edda", Role::Fisher, Vec2::new(10.5, 11.5)),
        ];

        let mut villagers = Vec::with_capacity(roster.len());
        let mut brains = Vec::with_capacity(roster.len());
        for (i, (name, role, spawn)) in roster.into_iter().enumerate() {
            let id = VillagerId(i as u32);
            villagers.push(Villager::new(id, name, role, spawn));
            brains.push(Brain::new(id, tree_for_role(role)));
        }

        Self {
            cfg,
            seed,
            tick: 0,
            world: World::standard(),
            global: Global::default(),
            villagers,
            brains,
            trace: TraceLog::default(),
            objectives: Objectives::default(),
        }
    }

    pub fn brain_mut(&mut self, id: VillagerId) -> Option<&mut Brain> {
        self.brains.iter_mut().find(|b| b.agent == id)
    }

    pub fn villager(&self, id: VillagerId) -> Option<&Villager> {
        self.villagers.iter().find(|v| v.id == id)
    }

    /// Advance the simulation by one fixed step.
    pub fn step(&mut self) {
        let ctx = TickContext {
            tick: self.tick,
            dt_seconds: self.cfg.tick_seconds,
            seed: self.seed,
        };

        let new_day = self.global.advance(&self.cfg, ctx.dt_seconds);
        let season = self.global.season(&self.cfg);
        if new_day {
            info!(day = self.global.day, season = season.name(), "day break");
        }

        let had_fire = self.world.fire.is_some();
        self.world
            .advance(&ctx, &self.cfg, season.growth_allowed(), &mut self.trace);
        match (had_fire, &self.world.fire) {
            (false, Some(fire)) => {
                warn!(building = fire.building, "a building caught fire");
            }
            (true, None) => info!("the fire is out"),
            _ => {}
        }

        let ambient = season.ambient_warmth();
        let fireplace = self.world.fireplace();
        for v in &mut self.villagers {
            let near_fire = self.global.fireplace_lit
                && v.pos.distance(fireplace) <= self.cfg.fireplace_radius;
            v.apply_drain(&self.cfg, ambient, near_fire, ctx.dt_seconds);
        }

        let Self {
            cfg,
            world,
            global,
            villagers,
            brains,
            trace,
            ..
        } = self;
        for brain in brains.iter_mut() {
            let mut host = SimHost {
                cfg: &*cfg,
                world: &mut *world,
                global: &mut *global,
                villagers: villagers.as_mut_slice(),
                trace: &mut *trace,
            };
            brain.tick(&ctx, &mut host);
        }

        self.objectives
            .update(&self.cfg, &self.global, &self.villagers, season, new_day);
        self.tick += 1;
    }

    /// Rewind to the initial state. Edited trees keep their structure; only
    /// their retained resume state is cleared.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.world = World::standard();
        self.global = Global::default();
        for v in &mut self.villagers {
            v.reset();
        }
        for brain in &mut self.brains {
            brain.tree.reset();
            brain.last = None;
        }
        self.trace.clear();
        self.objectives = Objectives::default();
    }
}
