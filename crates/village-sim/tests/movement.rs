use village_bt::BtStatus;
use village_core::TickContext;
use village_sim::{Role, SimConfig, Vec2, Villager, VillagerId, World};

fn ctx(tick: u64, cfg: &SimConfig) -> TickContext {
    TickContext {
        tick,
        dt_seconds: cfg.tick_seconds,
        seed: 7,
    }
}

fn walk_to(v: &mut Villager, world: &World, cfg: &SimConfig, target: Vec2, max_ticks: u64) -> bool {
    for tick in 0..max_ticks {
        assert!(
            !world.is_blocked(cfg, v.pos),
            "villager inside a wall at {:?}",
            v.pos
        );
        match v.advance_toward(world, cfg, &ctx(tick, cfg), target) {
            BtStatus::Success => return true,
            BtStatus::Running => {}
            BtStatus::Failure => panic!("walking never fails"),
        }
    }
    false
}

#[test]
fn walks_through_the_door_to_bed() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let bed = world.bed();
    let mut v = Villager::new(VillagerId(0), "Test", Role::Farmer, Vec2::new(5.0, 9.0));

    assert!(walk_to(&mut v, &world, &cfg, bed, 600));
    assert!(v.pos.distance(bed) <= cfg.arrival_epsilon);
}

#[test]
fn routes_around_a_wall_corner() {
    let cfg = SimConfig::default();
    let world = World::standard();
    // Start east of the house; the straight line to the bed cuts through the
    // south-east wall corner, so the walker has to slide along the wall and
    // in through the door.
    let mut v = Villager::new(VillagerId(0), "Test", Role::Farmer, Vec2::new(9.0, 8.0));

    assert!(walk_to(&mut v, &world, &cfg, world.bed(), 1200));
}

#[test]
fn already_there_is_immediate_success() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let spot = world.fishing_spot;
    let mut v = Villager::new(VillagerId(0), "Test", Role::Fisher, spot);

    assert_eq!(
        v.advance_toward(&world, &cfg, &ctx(0, &cfg), spot),
        BtStatus::Success
    );
    assert_eq!(v.pos.distance(spot), 0.0);
}

#[test]
fn walking_drains_energy() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let mut v = Villager::new(VillagerId(0), "Test", Role::Fisher, Vec2::new(14.0, 8.0));

    walk_to(&mut v, &world, &cfg, Vec2::new(20.0, 8.0), 200);
    assert!(v.energy < 100.0);
}

#[test]
fn low_vitals_slow_the_walk() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let start = Vec2::new(14.0, 8.0);
    let target = Vec2::new(20.0, 8.0);

    let mut brisk = Villager::new(VillagerId(0), "Brisk", Role::Fisher, start);
    let mut weary = Villager::new(VillagerId(1), "Weary", Role::Fisher, start);
    weary.hunger = cfg.slowdown_threshold - 1.0;

    brisk.advance_toward(&world, &cfg, &ctx(0, &cfg), target);
    weary.advance_toward(&world, &cfg, &ctx(0, &cfg), target);

    assert!(brisk.pos.distance(start) > weary.pos.distance(start));
}
