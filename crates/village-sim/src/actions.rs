use serde::{Deserialize, Serialize};
use village_bt::BtStatus;
use village_core::{AgentId, DeterministicRng, TickContext};

use crate::config::SimConfig;
use crate::economy::{Global, ItemKind};
use crate::math::Vec2;
use crate::streams;
use crate::villager::{Activity, Villager};
use crate::world::{BuildingKind, FieldState, TreeState, World};

/// The action vocabulary: everything a behavior tree can make a villager do.
///
/// Every action validates its preconditions first and refuses with a
/// diagnostic reason when they are unmet — a refusal is `Failure`, never a
/// panic. Multi-tick activities report `Running` until their duration
/// elapses, then apply their effect atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    // Navigation
    GoToField,
    GoToEmptyField,
    GoToWateringField,
    GoToMill,
    GoToBakery,
    GoToBarn,
    GoToKnittingHut,
    GoToBed,
    GoToFireplace,
    GoToTree,
    GoToSheep,
    GoToPond,
    GoToWell,
    GoToFire,

    // Farming
    PlantCrop,
    WaterField,
    HarvestCrop,

    // Food chain
    CollectWheat,
    GrindWheat,
    BakeBread,
    EatBread,
    EatCookedFish,

    // Wood chain
    ChopWood,
    StoreWood,
    FuelFireplace,

    // Wool chain
    ShearSheep,
    StoreWool,
    KnitSweater,
    WearSweater,

    // Fishing chain
    Fish,
    StoreFish,
    CookFish,

    // Rest & safety
    Sleep,
    WarmUp,
    FetchWater,
    ExtinguishFire,
    Idle,
}

/// Editor vocabulary: every action an external tree editor may offer.
pub const ALL_ACTIONS: &[Action] = &[
    Action::GoToField,
    Action::GoToEmptyField,
    Action::GoToWateringField,
    Action::GoToMill,
    Action::GoToBakery,
    Action::GoToBarn,
    Action::GoToKnittingHut,
    Action::GoToBed,
    Action::GoToFireplace,
    Action::GoToTree,
    Action::GoToSheep,
    Action::GoToPond,
    Action::GoToWell,
    Action::GoToFire,
    Action::PlantCrop,
    Action::WaterField,
    Action::HarvestCrop,
    Action::CollectWheat,
    Action::GrindWheat,
    Action::BakeBread,
    Action::EatBread,
    Action::EatCookedFish,
    Action::ChopWood,
    Action::StoreWood,
    Action::FuelFireplace,
    Action::ShearSheep,
    Action::StoreWool,
    Action::KnitSweater,
    Action::WearSweater,
    Action::Fish,
    Action::StoreFish,
    Action::CookFish,
    Action::Sleep,
    Action::WarmUp,
    Action::FetchWater,
    Action::ExtinguishFire,
    Action::Idle,
];

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::GoToField => "go_to_field",
            Action::GoToEmptyField => "go_to_empty_field",
            Action::GoToWateringField => "go_to_watering_field",
            Action::GoToMill => "go_to_mill",
            Action::GoToBakery => "go_to_bakery",
            Action::GoToBarn => "go_to_barn",
            Action::GoToKnittingHut => "go_to_knitting_hut",
            Action::GoToBed => "go_to_bed",
            Action::GoToFireplace => "go_to_fireplace",
            Action::GoToTree => "go_to_tree",
            Action::GoToSheep => "go_to_sheep",
            Action::GoToPond => "go_to_pond",
            Action::GoToWell => "go_to_well",
            Action::GoToFire => "go_to_fire",
            Action::PlantCrop => "plant_crop",
            Action::WaterField => "water_field",
            Action::HarvestCrop => "harvest_crop",
            Action::CollectWheat => "collect_wheat",
            Action::GrindWheat => "grind_wheat",
            Action::BakeBread => "bake_bread",
            Action::EatBread => "eat_bread",
            Action::EatCookedFish => "eat_cooked_fish",
            Action::ChopWood => "chop_wood",
            Action::StoreWood => "store_wood",
            Action::FuelFireplace => "fuel_fireplace",
            Action::ShearSheep => "shear_sheep",
            Action::StoreWool => "store_wool",
            Action::KnitSweater => "knit_sweater",
            Action::WearSweater => "wear_sweater",
            Action::Fish => "fish",
            Action::StoreFish => "store_fish",
            Action::CookFish => "cook_fish",
            Action::Sleep => "sleep",
            Action::WarmUp => "warm_up",
            Action::FetchWater => "fetch_water",
            Action::ExtinguishFire => "extinguish_fire",
            Action::Idle => "idle",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        ALL_ACTIONS.iter().copied().find(|a| a.name() == name)
    }

    /// Perform one tick of this action for villager `me`.
    pub fn perform(
        self,
        ctx: &TickContext,
        cfg: &SimConfig,
        me: usize,
        villagers: &mut [Villager],
        world: &mut World,
        global: &mut Global,
    ) -> BtStatus {
        match self {
            Action::GoToField => {
                go_to_field(ctx, cfg, me, villagers, world, FieldState::Ready, "no field is ready for harvest")
            }
            Action::GoToEmptyField => {
                go_to_field(ctx, cfg, me, villagers, world, FieldState::Empty, "no field is free for planting")
            }
            Action::GoToWateringField => {
                let v_pos = villagers[me].pos;
                let current = villagers[me]
                    .claim
                    .field
                    .filter(|&f| world.fields.get(f).is_some_and(|f| f.needs_water()));
                let target =
                    current.or_else(|| world.nearest_field_needing_water(v_pos, villagers, me));
                let Some(f) = target else {
                    return villagers[me].deny("no field needs watering");
                };
                let dest = world.fields[f].center;
                let v = &mut villagers[me];
                v.claim.field = Some(f);
                v.advance_toward(world, cfg, ctx, dest)
            }
            Action::GoToMill => go_to(ctx, cfg, me, villagers, world, world.anchor(BuildingKind::Mill)),
            Action::GoToBakery => go_to(ctx, cfg, me, villagers, world, world.anchor(BuildingKind::Bakery)),
            Action::GoToBarn => go_to(ctx, cfg, me, villagers, world, world.anchor(BuildingKind::Barn)),
            Action::GoToKnittingHut => {
                go_to(ctx, cfg, me, villagers, world, world.anchor(BuildingKind::KnittingHut))
            }
            Action::GoToBed => go_to(ctx, cfg, me, villagers, world, world.bed()),
            Action::GoToFireplace => go_to(ctx, cfg, me, villagers, world, world.fireplace()),
            Action::GoToWell => go_to(ctx, cfg, me, villagers, world, world.anchor(BuildingKind::Well)),
            Action::GoToPond => go_to(ctx, cfg, me, villagers, world, world.fishing_spot),
            Action::GoToTree => {
                let v_pos = villagers[me].pos;
                let current = villagers[me]
                    .claim
                    .tree
                    .filter(|&t| world.trees.get(t).is_some_and(|t| t.state == TreeState::Grown));
                let target = current.or_else(|| world.nearest_grown_tree(v_pos, villagers, me));
                let Some(t) = target else {
                    return villagers[me].deny("no tree is grown enough to chop");
                };
                let dest = world.trees[t].pos;
                let v = &mut villagers[me];
                v.claim.tree = Some(t);
                v.advance_toward(world, cfg, ctx, dest)
            }
            Action::GoToSheep => {
                let v_pos = villagers[me].pos;
                let current = villagers[me]
                    .claim
                    .sheep
                    .filter(|&s| world.sheep.get(s).is_some_and(|s| s.has_wool));
                let target = current.or_else(|| world.nearest_woolly_sheep(v_pos, villagers, me));
                let Some(s) = target else {
                    return villagers[me].deny("no sheep has wool to shear");
                };
                let dest = world.sheep[s].pos;
                let v = &mut villagers[me];
                v.claim.sheep = Some(s);
                v.advance_toward(world, cfg, ctx, dest)
            }
            Action::GoToFire => {
                let Some(fire) = world.fire else {
                    return villagers[me].deny("there is no fire to fight");
                };
                go_to(ctx, cfg, me, villagers, world, fire.pos)
            }

            Action::PlantCrop => {
                let Some(f) = villagers[me].claim.field else {
                    return villagers[me].deny("no field chosen for planting");
                };
                let Some(field) = world.fields.get(f).copied() else {
                    return villagers[me].deny("the chosen field no longer exists");
                };
                if !villagers[me].is_near(field.center, cfg) {
                    return villagers[me].deny("too far from the field to plant");
                }
                if field.state != FieldState::Empty {
                    return villagers[me].deny("the field is no longer empty");
                }
                let planted = &mut world.fields[f];
                planted.state = FieldState::Planted;
                planted.growth_timer = cfg.crop_grow_time;
                planted.watered = false;
                planted.water_timer = 0.0;
                let v = &mut villagers[me];
                v.claim.field = None;
                v.spend_energy(cfg.action_energy_cost);
                v.activity = Activity::Working;
                BtStatus::Success
            }
            Action::WaterField => {
                let Some(f) = villagers[me].claim.field else {
                    return villagers[me].deny("no field chosen for watering");
                };
                let Some(field) = world.fields.get(f).copied() else {
                    return villagers[me].deny("the chosen field no longer exists");
                };
                if !villagers[me].is_near(field.center, cfg) {
                    return villagers[me].deny("too far from the field to water");
                }
                if !field.needs_water() {
                    return villagers[me].deny("the field does not need water");
                }
                let watered = &mut world.fields[f];
                watered.watered = true;
                watered.water_timer = cfg.water_duration;
                let v = &mut villagers[me];
                v.claim.field = None;
                v.spend_energy(cfg.action_energy_cost);
                v.activity = Activity::Working;
                BtStatus::Success
            }
            Action::HarvestCrop => {
                let Some(f) = villagers[me].claim.field else {
                    return villagers[me].deny("no field chosen for harvest");
                };
                let Some(field) = world.fields.get(f).copied() else {
                    return villagers[me].deny("the chosen field no longer exists");
                };
                if !villagers[me].is_near(field.center, cfg) {
                    return villagers[me].deny("too far from the field to harvest");
                }
                if field.state != FieldState::Ready {
                    // The usual second-arrival miss: someone else got here first.
                    return villagers[me].deny("the field is no longer ready");
                }
                let harvested = &mut world.fields[f];
                harvested.state = FieldState::Empty;
                harvested.watered = false;
                harvested.water_timer = 0.0;
                global.wheat += 1;
                global.totals.crops_harvested += 1;
                let v = &mut villagers[me];
                v.claim.field = None;
                v.spend_energy(cfg.action_energy_cost);
                v.activity = Activity::Working;
                BtStatus::Success
            }

            Action::CollectWheat => {
                let barn = world.anchor(BuildingKind::Barn);
                let v = &mut villagers[me];
                if !v.is_near(barn, cfg) {
                    return v.deny("too far from the barn");
                }
                if global.wheat < cfg.wheat_per_flour {
                    return v.deny("not enough wheat is stored");
                }
                if !v.try_carry(ItemKind::Wheat, cfg.wheat_per_flour) {
                    return v.deny("hands are already full");
                }
                global.wheat -= cfg.wheat_per_flour;
                BtStatus::Success
            }
            Action::GrindWheat => {
                let mill = world.anchor(BuildingKind::Mill);
                let v = &mut villagers[me];
                if !v.is_near(mill, cfg) {
                    return v.deny("not inside the mill");
                }
                let wheat = v.carrying(ItemKind::Wheat);
                if wheat < cfg.wheat_per_flour {
                    return v.deny("not carrying enough wheat to grind");
                }
                if !v.make_progress(Action::GrindWheat, cfg.grind_duration, ctx.dt_seconds) {
                    return BtStatus::Running;
                }
                let flour = wheat / cfg.wheat_per_flour;
                v.inventory = Some((ItemKind::Flour, flour));
                // An uneven stack leaves ungrindable wheat; it goes back to
                // the stores rather than vanishing.
                global.wheat += wheat % cfg.wheat_per_flour;
                v.spend_energy(cfg.action_energy_cost);
                BtStatus::Success
            }
            Action::BakeBread => {
                let oven = world.anchor(BuildingKind::Bakery);
                let v = &mut villagers[me];
                if !v.is_near(oven, cfg) {
                    return v.deny("not at the bakery oven");
                }
                let flour = v.carrying(ItemKind::Flour);
                if flour < cfg.flour_per_bread {
                    return v.deny("not carrying enough flour to bake");
                }
                if !v.make_progress(Action::BakeBread, cfg.bake_duration, ctx.dt_seconds) {
                    return BtStatus::Running;
                }
                let loaves = flour / cfg.flour_per_bread;
                v.inventory = None;
                global.bread += loaves;
                global.flour += flour % cfg.flour_per_bread;
                global.totals.bread_baked += loaves;
                v.spend_energy(cfg.action_energy_cost);
                BtStatus::Success
            }
            Action::EatBread => {
                let v = &mut villagers[me];
                if global.bread == 0 {
                    return v.deny("there is no bread in the pantry");
                }
                global.bread -= 1;
                v.hunger = (v.hunger + cfg.bread_restore).min(100.0);
                BtStatus::Success
            }
            Action::EatCookedFish => {
                let v = &mut villagers[me];
                if global.cooked_fish == 0 {
                    return v.deny("there is no cooked fish left");
                }
                global.cooked_fish -= 1;
                v.hunger = (v.hunger + cfg.fish_restore).min(100.0);
                BtStatus::Success
            }

            Action::ChopWood => {
                let Some(t) = villagers[me].claim.tree else {
                    return villagers[me].deny("no tree chosen for chopping");
                };
                let Some(tree) = world.trees.get(t).copied() else {
                    return villagers[me].deny("the chosen tree no longer exists");
                };
                if !villagers[me].is_near(tree.pos, cfg) {
                    return villagers[me].deny("too far from the tree");
                }
                if tree.state != TreeState::Grown {
                    return villagers[me].deny("the tree is still regrowing");
                }
                if villagers[me].carrying(ItemKind::Wood) == 0
                    && villagers[me].inventory.is_some()
                {
                    return villagers[me].deny("hands are already full");
                }
                if !villagers[me].make_progress(Action::ChopWood, cfg.chop_duration, ctx.dt_seconds)
                {
                    return BtStatus::Running;
                }
                let chopped = &mut world.trees[t];
                chopped.state = TreeState::Regrowing;
                chopped.regrow_timer = cfg.tree_regrow_time;
                global.totals.wood_chopped += 1;
                let v = &mut villagers[me];
                v.try_carry(ItemKind::Wood, 1);
                v.claim.tree = None;
                v.spend_energy(cfg.action_energy_cost);
                BtStatus::Success
            }
            Action::StoreWood => store_carried(cfg, me, villagers, world, global, ItemKind::Wood),
            Action::FuelFireplace => {
                let fireplace = world.fireplace();
                let v = &mut villagers[me];
                if !v.is_near(fireplace, cfg) {
                    return v.deny("not at the fireplace");
                }
                if global.wood == 0 {
                    return v.deny("no wood is stored for the fire");
                }
                global.wood -= 1;
                global.fireplace_fuel += cfg.fireplace_fuel_per_log;
                global.fireplace_lit = true;
                BtStatus::Success
            }

            Action::ShearSheep => {
                let Some(s) = villagers[me].claim.sheep else {
                    return villagers[me].deny("no sheep chosen for shearing");
                };
                let Some(sheep) = world.sheep.get(s).copied() else {
                    return villagers[me].deny("the chosen sheep no longer exists");
                };
                if !villagers[me].is_near(sheep.pos, cfg) {
                    return villagers[me].deny("the sheep wandered off");
                }
                if !sheep.has_wool {
                    return villagers[me].deny("the sheep has already been sheared");
                }
                if villagers[me].carrying(ItemKind::Wool) == 0
                    && villagers[me].inventory.is_some()
                {
                    return villagers[me].deny("hands are already full");
                }
                if !villagers[me].make_progress(
                    Action::ShearSheep,
                    cfg.shear_duration,
                    ctx.dt_seconds,
                ) {
                    return BtStatus::Running;
                }
                let sheared = &mut world.sheep[s];
                sheared.has_wool = false;
                sheared.wool_timer = cfg.wool_regrow_time;
                let v = &mut villagers[me];
                v.try_carry(ItemKind::Wool, 1);
                v.claim.sheep = None;
                v.spend_energy(cfg.action_energy_cost);
                BtStatus::Success
            }
            Action::StoreWool => store_carried(cfg, me, villagers, world, global, ItemKind::Wool),
            Action::KnitSweater => {
                let hut = world.anchor(BuildingKind::KnittingHut);
                let v = &mut villagers[me];
                if !v.is_near(hut, cfg) {
                    return v.deny("not at the knitting hut");
                }
                if global.wool == 0 {
                    return v.deny("no wool is stored");
                }
                if !v.make_progress(Action::KnitSweater, cfg.knit_duration, ctx.dt_seconds) {
                    return BtStatus::Running;
                }
                global.wool -= 1;
                global.sweaters += 1;
                global.totals.sweaters_knitted += 1;
                v.spend_energy(cfg.action_energy_cost);
                BtStatus::Success
            }
            Action::WearSweater => {
                let v = &mut villagers[me];
                if v.wearing_sweater {
                    return v.deny("already wearing a sweater");
                }
                if global.sweaters == 0 {
                    return v.deny("no sweater is available");
                }
                global.sweaters -= 1;
                v.wearing_sweater = true;
                BtStatus::Success
            }

            Action::Fish => {
                let spot = world.fishing_spot;
                let v = &mut villagers[me];
                if !v.is_near(spot, cfg) {
                    return v.deny("not at the pond");
                }
                if v.carrying(ItemKind::Fish) == 0 && v.inventory.is_some() {
                    return v.deny("hands are already full");
                }
                if v.make_progress(Action::Fish, f32::INFINITY, ctx.dt_seconds) {
                    // Unreachable: the duration is open-ended.
                    return BtStatus::Running;
                }
                if v.progress >= cfg.fish_min_duration {
                    // Variable-yield foraging: a fixed per-tick bite chance
                    // once the line has been in long enough.
                    let mut rng =
                        ctx.rng_for_stream(streams::FISHING.wrapping_add(v.id.stable_id()));
                    if rng.chance(cfg.fish_success_chance) {
                        v.finish_progress();
                        v.try_carry(ItemKind::Fish, 1);
                        v.spend_energy(cfg.action_energy_cost);
                        return BtStatus::Success;
                    }
                    if v.progress >= cfg.fish_min_duration * cfg.fish_give_up_factor {
                        return v.deny("the fish are not biting today");
                    }
                }
                BtStatus::Running
            }
            Action::StoreFish => store_carried(cfg, me, villagers, world, global, ItemKind::Fish),
            Action::CookFish => {
                let fireplace = world.fireplace();
                let v = &mut villagers[me];
                if !v.is_near(fireplace, cfg) {
                    return v.deny("not at the fireplace");
                }
                if !global.fireplace_lit {
                    return v.deny("the fireplace is not lit");
                }
                if global.fish == 0 {
                    return v.deny("no fish is stored");
                }
                if !v.make_progress(Action::CookFish, cfg.cook_duration, ctx.dt_seconds) {
                    return BtStatus::Running;
                }
                global.fish -= 1;
                global.cooked_fish += 1;
                global.totals.fish_cooked += 1;
                v.spend_energy(cfg.action_energy_cost);
                BtStatus::Success
            }

            Action::Sleep => {
                let bed = world.bed();
                let v = &mut villagers[me];
                if !v.is_near(bed, cfg) {
                    return v.deny("not in bed");
                }
                if v.energy >= 100.0 {
                    v.activity = Activity::Idle;
                    return BtStatus::Success;
                }
                v.activity = Activity::Sleeping;
                v.energy = (v.energy + cfg.sleep_restore * ctx.dt_seconds).min(100.0);
                BtStatus::Running
            }
            Action::WarmUp => {
                let fireplace = world.fireplace();
                let v = &mut villagers[me];
                if !v.is_near(fireplace, cfg) {
                    return v.deny("not at the fireplace");
                }
                if !global.fireplace_lit {
                    return v.deny("the fireplace is not lit");
                }
                if v.warmth >= cfg.warm_enough {
                    v.activity = Activity::Idle;
                    return BtStatus::Success;
                }
                v.activity = Activity::Working;
                v.warmth = (v.warmth + cfg.warmup_rate * ctx.dt_seconds).min(100.0);
                BtStatus::Running
            }
            Action::FetchWater => {
                let well = world.anchor(BuildingKind::Well);
                let v = &mut villagers[me];
                if !v.is_near(well, cfg) {
                    return v.deny("not at the well");
                }
                v.has_water = true;
                BtStatus::Success
            }
            Action::ExtinguishFire => {
                let Some(fire) = world.fire else {
                    return villagers[me].deny("the fire is already out");
                };
                let v = &mut villagers[me];
                if !v.is_near(fire.pos, cfg) {
                    return v.deny("too far from the fire");
                }
                if !v.has_water {
                    return v.deny("no water to throw");
                }
                v.has_water = false;
                v.spend_energy(cfg.action_energy_cost);
                let cleared = {
                    let Some(fire) = world.fire.as_mut() else {
                        return BtStatus::Success;
                    };
                    fire.intensity -= cfg.extinguish_amount;
                    fire.progress += cfg.extinguish_amount;
                    fire.intensity <= 0.0 || fire.progress >= cfg.extinguish_threshold
                };
                if cleared {
                    world.fire = None;
                }
                BtStatus::Success
            }
            Action::Idle => {
                villagers[me].activity = Activity::Idle;
                BtStatus::Success
            }
        }
    }
}

/// Walk toward a fixed destination.
fn go_to(
    ctx: &TickContext,
    cfg: &SimConfig,
    me: usize,
    villagers: &mut [Villager],
    world: &World,
    dest: Vec2,
) -> BtStatus {
    villagers[me].advance_toward(world, cfg, ctx, dest)
}

/// Walk toward the nearest field in `want`, claiming it on the way.
fn go_to_field(
    ctx: &TickContext,
    cfg: &SimConfig,
    me: usize,
    villagers: &mut [Villager],
    world: &World,
    want: FieldState,
    missing: &'static str,
) -> BtStatus {
    let v_pos = villagers[me].pos;
    let current = villagers[me]
        .claim
        .field
        .filter(|&f| world.fields.get(f).is_some_and(|f| f.state == want));
    let target = current.or_else(|| world.nearest_field(v_pos, want, villagers, me));
    let Some(f) = target else {
        return villagers[me].deny(missing);
    };
    let dest = world.fields[f].center;
    let v = &mut villagers[me];
    v.claim.field = Some(f);
    v.advance_toward(world, cfg, ctx, dest)
}

/// Deposit the whole carried stack of `kind` at the barn.
fn store_carried(
    cfg: &SimConfig,
    me: usize,
    villagers: &mut [Villager],
    world: &World,
    global: &mut Global,
    kind: ItemKind,
) -> BtStatus {
    let barn = world.anchor(BuildingKind::Barn);
    let v = &mut villagers[me];
    if !v.is_near(barn, cfg) {
        return v.deny("too far from the barn");
    }
    let count = v.carrying(kind);
    if count == 0 {
        return v.deny("carrying nothing to store");
    }
    v.inventory = None;
    match kind {
        ItemKind::Wheat => global.wheat += count,
        ItemKind::Flour => global.flour += count,
        ItemKind::Bread => global.bread += count,
        ItemKind::Wood => global.wood += count,
        ItemKind::Wool => global.wool += count,
        ItemKind::Sweater => global.sweaters += count,
        ItemKind::Fish => global.fish += count,
        ItemKind::CookedFish => global.cooked_fish += count,
    }
    BtStatus::Success
}
