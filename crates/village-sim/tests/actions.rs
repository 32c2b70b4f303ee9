use village_bt::BtStatus;
use village_core::{TickContext, TraceLog};
use village_sim::{
    Action, BuildingKind, FieldState, Global, ItemKind, Role, SimConfig, Vec2, Villager,
    VillagerId, World,
};

fn ctx(tick: u64, cfg: &SimConfig) -> TickContext {
    TickContext {
        tick,
        dt_seconds: cfg.tick_seconds,
        seed: 3,
    }
}

fn one_villager(world: &World, kind: BuildingKind) -> Vec<Villager> {
    vec![Villager::new(
        VillagerId(0),
        "Test",
        Role::Farmer,
        world.anchor(kind),
    )]
}

#[test]
fn action_names_round_trip() {
    for &action in village_sim::actions::ALL_ACTIONS {
        assert_eq!(Action::from_name(action.name()), Some(action));
    }
    assert_eq!(Action::from_name("no_such_action"), None);
}

#[test]
fn grinding_is_gradual_but_converts_atomically() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Mill);
    vs[0].try_carry(ItemKind::Wheat, cfg.wheat_per_flour);

    let mut world = world;
    let ticks = (cfg.grind_duration / cfg.tick_seconds) as u64;
    for tick in 0..ticks - 1 {
        let status =
            Action::GrindWheat.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        assert_eq!(status, BtStatus::Running);
        assert_eq!(vs[0].carrying(ItemKind::Wheat), cfg.wheat_per_flour, "conversion leaked early");
    }
    let status =
        Action::GrindWheat.perform(&ctx(ticks, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Success);
    assert_eq!(vs[0].carrying(ItemKind::Flour), 1);
    assert_eq!(vs[0].carrying(ItemKind::Wheat), 0);
}

#[test]
fn uneven_stacks_return_the_remainder_to_the_stores() {
    let mut cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Mill);

    // One wheat more than a grind consumes.
    vs[0].inventory = Some((ItemKind::Wheat, cfg.wheat_per_flour + 1));
    let mut tick = 0;
    loop {
        let status =
            Action::GrindWheat.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert!(tick < 1_000);
    }
    assert_eq!(vs[0].carrying(ItemKind::Flour), 1);
    assert_eq!(global.wheat, 1, "the odd wheat goes back to the stores");

    // Same for flour at the oven.
    cfg.flour_per_bread = 2;
    vs[0].inventory = Some((ItemKind::Flour, 3));
    vs[0].pos = world.anchor(BuildingKind::Bakery);
    let bread_before = global.bread;
    loop {
        let status =
            Action::BakeBread.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert!(tick < 1_000);
    }
    assert_eq!(global.bread, bread_before + 1);
    assert_eq!(global.flour, 1, "the odd flour goes back to the stores");
    assert!(vs[0].inventory.is_none());
}

#[test]
fn precondition_miss_fails_with_a_reason() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Mill);

    // Empty-handed at the mill.
    let status =
        Action::GrindWheat.perform(&ctx(0, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Failure);
    assert!(vs[0].last_failure.is_some());

    // Far from the barn.
    vs[0].try_carry(ItemKind::Wood, 1);
    let status =
        Action::StoreWood.perform(&ctx(1, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Failure);
}

#[test]
fn switching_actions_discards_progress() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Mill);
    vs[0].try_carry(ItemKind::Wheat, cfg.wheat_per_flour);

    Action::GrindWheat.perform(&ctx(0, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    Action::GrindWheat.perform(&ctx(1, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    let before = vs[0].progress;
    assert!(before > 0.0);

    // A denied action abandons the counter entirely.
    Action::BakeBread.perform(&ctx(2, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(vs[0].progress, 0.0);
}

#[test]
fn harvest_collect_grind_bake_pipeline() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);

    // Harvest a ready field standing next to it.
    world.fields[0].state = FieldState::Ready;
    vs[0].pos = world.fields[0].center;
    vs[0].claim.field = Some(0);
    let status =
        Action::HarvestCrop.perform(&ctx(0, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Success);
    assert_eq!(global.wheat, 1);
    assert_eq!(global.totals.crops_harvested, 1);
    assert_eq!(world.fields[0].state, FieldState::Empty);
    assert_eq!(vs[0].claim.field, None);

    // Not enough stored wheat yet.
    vs[0].pos = world.anchor(BuildingKind::Barn);
    let status =
        Action::CollectWheat.perform(&ctx(1, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Failure);

    global.wheat = cfg.wheat_per_flour;
    let status =
        Action::CollectWheat.perform(&ctx(2, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Success);
    assert_eq!(global.wheat, 0);
    assert_eq!(vs[0].carrying(ItemKind::Wheat), cfg.wheat_per_flour);

    // Grind, then bake.
    vs[0].pos = world.anchor(BuildingKind::Mill);
    let mut tick = 3;
    loop {
        let status =
            Action::GrindWheat.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert!(tick < 1_000);
    }
    assert_eq!(vs[0].carrying(ItemKind::Flour), 1);

    vs[0].pos = world.anchor(BuildingKind::Bakery);
    loop {
        let status =
            Action::BakeBread.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert!(tick < 1_000);
    }
    assert_eq!(global.bread, Global::default().bread + 1);
    assert_eq!(global.totals.bread_baked, 1);
    assert!(vs[0].inventory.is_none());
}

#[test]
fn two_fields_grow_and_harvest_independently() {
    let mut cfg = SimConfig::default();
    cfg.fire_ignition_chance = 0.0;
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    let mut trace = TraceLog::default();

    // Stand between the two nearest fields and work both.
    vs[0].pos = Vec2::new(9.0, 8.5);
    let mut tick = 0;
    for f in 0..2 {
        vs[0].claim.field = Some(f);
        let status =
            Action::PlantCrop.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        assert_eq!(status, BtStatus::Success);
        tick += 1;
        vs[0].claim.field = Some(f);
        let status =
            Action::WaterField.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        assert_eq!(status, BtStatus::Success);
        tick += 1;
    }
    assert_eq!(world.fields[0].state, FieldState::Planted);
    assert_eq!(world.fields[1].state, FieldState::Planted);

    // Let the crops grow, topping the water up whenever it dries out.
    while world.fields[..2]
        .iter()
        .any(|f| f.state != FieldState::Ready)
    {
        world.advance(&ctx(tick, &cfg), &cfg, true, &mut trace);
        for f in 0..2 {
            if world.fields[f].needs_water() {
                vs[0].claim.field = Some(f);
                let status = Action::WaterField
                    .perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
                assert_eq!(status, BtStatus::Success);
            }
        }
        tick += 1;
        assert!(tick < 100_000, "crops never ripened");
    }

    let before = global.wheat;
    for f in 0..2 {
        vs[0].claim.field = Some(f);
        let status = Action::HarvestCrop
            .perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        assert_eq!(status, BtStatus::Success);
        tick += 1;
    }
    assert_eq!(global.wheat, before + 2);
    assert_eq!(world.fields[0].state, FieldState::Empty);
    assert_eq!(world.fields[1].state, FieldState::Empty);
}

#[test]
fn eating_consumes_stock_and_restores_hunger() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    vs[0].hunger = 10.0;

    let before = global.bread;
    let status = Action::EatBread.perform(&ctx(0, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Success);
    assert_eq!(global.bread, before - 1);
    assert_eq!(vs[0].hunger, 10.0 + cfg.bread_restore);

    global.bread = 0;
    let status = Action::EatBread.perform(&ctx(1, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Failure);
}

#[test]
fn chopping_fells_the_tree_and_yields_wood() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    vs[0].pos = world.trees[0].pos;
    vs[0].claim.tree = Some(0);

    let mut tick = 0;
    loop {
        let status =
            Action::ChopWood.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert_eq!(status, BtStatus::Running);
        assert!(tick < 1_000);
    }
    assert_eq!(vs[0].carrying(ItemKind::Wood), 1);
    assert_eq!(world.trees[0].state, village_sim::TreeState::Regrowing);
    assert_eq!(vs[0].claim.tree, None);
    assert_eq!(global.totals.wood_chopped, 1);
}

#[test]
fn fueling_lights_the_fireplace() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    vs[0].pos = world.fireplace();

    global.wood = 1;
    let status =
        Action::FuelFireplace.perform(&ctx(0, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Success);
    assert!(global.fireplace_lit);
    assert_eq!(global.wood, 0);
    assert_eq!(global.fireplace_fuel, cfg.fireplace_fuel_per_log);

    // No wood left: refused.
    let status =
        Action::FuelFireplace.perform(&ctx(1, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Failure);
}

#[test]
fn fishing_succeeds_quickly_when_fish_always_bite() {
    let mut cfg = SimConfig::default();
    cfg.fish_success_chance = 1.0;
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    vs[0].pos = world.fishing_spot;

    let mut tick = 0;
    loop {
        let status =
            Action::Fish.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert_eq!(status, BtStatus::Running);
        assert!(tick < 1_000);
    }
    // Nothing bites before the line has been in the water long enough.
    let min_ticks = (cfg.fish_min_duration / cfg.tick_seconds) as u64;
    assert!(tick >= min_ticks);
    assert_eq!(vs[0].carrying(ItemKind::Fish), 1);
}

#[test]
fn fishing_gives_up_when_nothing_bites() {
    let mut cfg = SimConfig::default();
    cfg.fish_success_chance = 0.0;
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    vs[0].pos = world.fishing_spot;

    let mut tick = 0;
    loop {
        let status =
            Action::Fish.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Failure {
            break;
        }
        assert!(tick < 10_000, "never gave up");
    }
    assert!(vs[0].last_failure.is_some());
    assert!(vs[0].inventory.is_none());
}

#[test]
fn cooking_requires_a_lit_fireplace() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    vs[0].pos = world.fireplace();
    global.fish = 1;

    let status = Action::CookFish.perform(&ctx(0, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
    assert_eq!(status, BtStatus::Failure);

    global.fireplace_lit = true;
    global.fireplace_fuel = 100.0;
    let mut tick = 1;
    loop {
        let status =
            Action::CookFish.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert!(tick < 1_000);
    }
    assert_eq!(global.fish, 0);
    assert_eq!(global.cooked_fish, 1);
}

#[test]
fn sleeping_restores_energy_to_full() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);
    vs[0].pos = world.bed();
    vs[0].energy = 20.0;

    let mut tick = 0;
    loop {
        let status =
            Action::Sleep.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert_eq!(vs[0].activity, village_sim::Activity::Sleeping);
        assert!(tick < 10_000);
    }
    assert_eq!(vs[0].energy, 100.0);
}

#[test]
fn wool_to_sweater_chain() {
    let cfg = SimConfig::default();
    let mut world = World::standard();
    let mut global = Global::default();
    let mut vs = one_villager(&world, BuildingKind::Barn);

    // Shear a sheep standing right next to it.
    vs[0].pos = world.sheep[0].pos;
    vs[0].claim.sheep = Some(0);
    let mut tick = 0;
    loop {
        // Hold the sheep still for the duration of the clip.
        let pinned = vs[0].pos;
        world.sheep[0].pos = pinned;
        let status =
            Action::ShearSheep.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert!(tick < 1_000);
    }
    assert!(!world.sheep[0].has_wool);
    assert_eq!(vs[0].carrying(ItemKind::Wool), 1);

    // Store, knit, wear.
    vs[0].pos = world.anchor(BuildingKind::Barn);
    assert_eq!(
        Action::StoreWool.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global),
        BtStatus::Success
    );
    assert_eq!(global.wool, 1);

    vs[0].pos = world.anchor(BuildingKind::KnittingHut);
    loop {
        let status = Action::KnitSweater
            .perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global);
        tick += 1;
        if status == BtStatus::Success {
            break;
        }
        assert!(tick < 1_000);
    }
    assert_eq!(global.wool, 0);
    assert_eq!(global.sweaters, 1);

    assert_eq!(
        Action::WearSweater.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global),
        BtStatus::Success
    );
    assert!(vs[0].wearing_sweater);
    assert_eq!(global.sweaters, 0);

    // A second sweater would be wasted.
    global.sweaters = 1;
    assert_eq!(
        Action::WearSweater.perform(&ctx(tick, &cfg), &cfg, 0, &mut vs, &mut world, &mut global),
        BtStatus::Failure
    );
    assert_eq!(global.sweaters, 1);
}
