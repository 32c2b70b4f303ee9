use village_sim::{BuildingKind, SimConfig, Vec2, World};

#[test]
fn interior_and_door_gap_are_walkable() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let house = world.building(BuildingKind::House).unwrap();

    // Inside the footprint.
    assert!(!world.is_blocked(&cfg, house.rect.center()));
    // On the south wall line, centered on the door.
    let door_x = house.rect.center().x;
    assert!(!world.is_blocked(&cfg, Vec2::new(door_x, house.rect.max.y)));
    // Just outside the door.
    assert!(!world.is_blocked(&cfg, house.door_center(&cfg)));
}

#[test]
fn walls_block_off_the_door() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let house = world.building(BuildingKind::House).unwrap();

    // South wall, well away from the door gap.
    let p = Vec2::new(house.rect.min.x + 0.5, house.rect.max.y);
    assert!(world.is_blocked(&cfg, p));
    // North wall has no door at all.
    let p = Vec2::new(house.rect.center().x, house.rect.min.y);
    assert!(world.is_blocked(&cfg, p));
}

#[test]
fn the_well_has_no_walls() {
    let cfg = SimConfig::default();
    let world = World::standard();
    let well = world.building(BuildingKind::Well).unwrap();
    assert!(!world.is_blocked(&cfg, well.rect.center()));
    assert!(!world.is_blocked(&cfg, Vec2::new(well.rect.min.x, well.rect.center().y)));
}

#[test]
fn pond_fences_and_bounds_block() {
    let cfg = SimConfig::default();
    let world = World::standard();

    assert!(world.is_blocked(&cfg, world.pond.center()));
    // A south fence tile of the pasture.
    assert!(world.is_blocked(&cfg, Vec2::new(13.5, 14.5)));
    // The pasture entrance on the north side is open.
    assert!(!world.is_blocked(&cfg, Vec2::new(14.5, 10.5)));
    assert!(world.is_blocked(&cfg, Vec2::new(-1.0, 5.0)));
    assert!(world.is_blocked(&cfg, Vec2::new(5.0, 100.0)));
}

#[test]
fn work_anchors_are_walkable() {
    let cfg = SimConfig::default();
    let world = World::standard();

    for kind in [
        BuildingKind::Mill,
        BuildingKind::Bakery,
        BuildingKind::Barn,
        BuildingKind::KnittingHut,
        BuildingKind::Well,
    ] {
        let anchor = world.anchor(kind);
        assert!(!world.is_blocked(&cfg, anchor), "{} anchor blocked", kind.name());
        assert!(
            !world.is_blocked(&cfg, world.building(kind).unwrap().door_center(&cfg)),
            "{} door blocked",
            kind.name()
        );
    }
    assert!(!world.is_blocked(&cfg, world.bed()));
    assert!(!world.is_blocked(&cfg, world.fireplace()));
    assert!(!world.is_blocked(&cfg, world.fishing_spot));
    for field in &world.fields {
        assert!(!world.is_blocked(&cfg, field.center));
    }
}
