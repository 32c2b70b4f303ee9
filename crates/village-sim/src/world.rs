use serde::{Deserialize, Serialize};
use village_core::{DeterministicRng, TickContext, TraceEvent, TraceLog};

use crate::config::SimConfig;
use crate::math::{Rect, Vec2};
use crate::streams;
use crate::villager::Villager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Mill,
    Bakery,
    Barn,
    KnittingHut,
    Well,
}

impl BuildingKind {
    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::House => "house",
            BuildingKind::Mill => "mill",
            BuildingKind::Bakery => "bakery",
            BuildingKind::Barn => "barn",
            BuildingKind::KnittingHut => "knitting_hut",
            BuildingKind::Well => "well",
        }
    }
}

/// Which wall carries the door gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorSide {
    North,
    South,
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub rect: Rect,
    pub door: DoorSide,
}

impl Building {
    /// Point on the door line, just outside the wall band.
    pub fn door_center(&self, cfg: &SimConfig) -> Vec2 {
        let c = self.rect.center();
        let out = cfg.wall_band + 0.1;
        match self.door {
            DoorSide::North => Vec2::new(c.x, self.rect.min.y - out),
            DoorSide::South => Vec2::new(c.x, self.rect.max.y + out),
            DoorSide::West => Vec2::new(self.rect.min.x - out, c.y),
            DoorSide::East => Vec2::new(self.rect.max.x + out, c.y),
        }
    }

    fn in_door_gap(&self, p: Vec2, cfg: &SimConfig) -> bool {
        let half = cfg.door_width * 0.5;
        let band = cfg.wall_band;
        let c = self.rect.center();
        match self.door {
            DoorSide::North => (p.y - self.rect.min.y).abs() <= band && (p.x - c.x).abs() <= half,
            DoorSide::South => (p.y - self.rect.max.y).abs() <= band && (p.x - c.x).abs() <= half,
            DoorSide::West => (p.x - self.rect.min.x).abs() <= band && (p.y - c.y).abs() <= half,
            DoorSide::East => (p.x - self.rect.max.x).abs() <= band && (p.y - c.y).abs() <= half,
        }
    }

    /// Wall-band collision: a thin margin around the four edges, minus the
    /// door gap. The interior footprint is never blocked; the well has no
    /// walls at all.
    pub fn blocks(&self, p: Vec2, cfg: &SimConfig) -> bool {
        if self.kind == BuildingKind::Well {
            return false;
        }
        if !self.rect.expand(cfg.wall_band).contains(p) {
            return false;
        }
        if self.rect.expand(-cfg.wall_band).contains(p) {
            return false;
        }
        !self.in_door_gap(p, cfg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldState {
    Empty,
    Planted,
    Growing,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub center: Vec2,
    pub state: FieldState,
    pub growth_timer: f32,
    pub water_timer: f32,
    pub watered: bool,
}

impl Field {
    fn new(center: Vec2) -> Self {
        Self {
            center,
            state: FieldState::Empty,
            growth_timer: 0.0,
            water_timer: 0.0,
            watered: false,
        }
    }

    pub fn needs_water(&self) -> bool {
        matches!(self.state, FieldState::Planted | FieldState::Growing) && !self.watered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeState {
    Grown,
    Regrowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeStand {
    pub pos: Vec2,
    pub state: TreeState,
    pub regrow_timer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sheep {
    pub pos: Vec2,
    pub has_wool: bool,
    pub wool_timer: f32,
    wander_target: Vec2,
    dwell_timer: f32,
}

/// The singular active fire outbreak; at most one exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireOutbreak {
    pub building: usize,
    /// Where firefighters gather: the burning building's door.
    pub pos: Vec2,
    pub progress: f32,
    pub intensity: f32,
}

/// The shared tile world: terrain, buildings, and everything that grows,
/// wanders, or burns on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub bounds: Rect,
    pub buildings: Vec<Building>,
    pub fields: Vec<Field>,
    pub trees: Vec<TreeStand>,
    pub sheep: Vec<Sheep>,
    pub fences: Vec<(i32, i32)>,
    pub pond: Rect,
    pub fishing_spot: Vec2,
    pub pasture: Rect,
    pub fire: Option<FireOutbreak>,
}

impl World {
    /// The fixed village layout.
    pub fn standard() -> Self {
        let buildings = vec![
            Building {
                kind: BuildingKind::House,
                rect: Rect::new(Vec2::new(2.0, 2.0), Vec2::new(8.0, 7.0)),
                door: DoorSide::South,
            },
            Building {
                kind: BuildingKind::Bakery,
                rect: Rect::new(Vec2::new(10.0, 2.0), Vec2::new(14.0, 6.0)),
                door: DoorSide::South,
            },
            Building {
                kind: BuildingKind::Mill,
                rect: Rect::new(Vec2::new(16.0, 2.0), Vec2::new(21.0, 6.0)),
                door: DoorSide::South,
            },
            Building {
                kind: BuildingKind::Barn,
                rect: Rect::new(Vec2::new(2.0, 10.0), Vec2::new(6.0, 14.0)),
                door: DoorSide::East,
            },
            Building {
                kind: BuildingKind::KnittingHut,
                rect: Rect::new(Vec2::new(19.0, 10.0), Vec2::new(23.0, 14.0)),
                door: DoorSide::West,
            },
            Building {
                kind: BuildingKind::Well,
                rect: Rect::new(Vec2::new(11.5, 8.5), Vec2::new(12.5, 9.5)),
                door: DoorSide::South,
            },
        ];

        let fields = vec![
            Field::new(Vec2::new(8.5, 8.5)),
            Field::new(Vec2::new(9.5, 8.5)),
            Field::new(Vec2::new(8.5, 9.5)),
            Field::new(Vec2::new(9.5, 9.5)),
        ];

        let trees = [
            Vec2::new(15.5, 8.0),
            Vec2::new(16.5, 8.5),
            Vec2::new(15.5, 9.5),
        ]
        .into_iter()
        .map(|pos| TreeStand {
            pos,
            state: TreeState::Grown,
            regrow_timer: 0.0,
        })
        .collect();

        let pasture = Rect::new(Vec2::new(12.0, 11.0), Vec2::new(17.0, 15.0));
        let sheep = [
            Vec2::new(13.0, 12.0),
            Vec2::new(15.0, 13.0),
            Vec2::new(14.0, 14.0),
        ]
        .into_iter()
        .map(|pos| Sheep {
            pos,
            has_wool: true,
            wool_timer: 0.0,
            wander_target: pos,
            dwell_timer: 0.0,
        })
        .collect();

        // Pasture fence on the south, east, and west sides; the north side is
        // the entrance. Sheep stay inside via the wander clamp.
        let mut fences = Vec::new();
        for x in 12..17 {
            fences.push((x, 14)); // south
        }
        for y in 11..15 {
            fences.push((11, y)); // west
            fences.push((17, y)); // east
        }

        Self {
            bounds: Rect::new(Vec2::new(0.0, 0.0), Vec2::new(24.0, 16.0)),
            buildings,
            fields,
            trees,
            sheep,
            fences,
            pond: Rect::new(Vec2::new(8.0, 12.0), Vec2::new(11.0, 15.0)),
            fishing_spot: Vec2::new(9.5, 11.6),
            pasture,
            fire: None,
        }
    }

    pub fn building(&self, kind: BuildingKind) -> Option<&Building> {
        self.buildings.iter().find(|b| b.kind == kind)
    }

    /// Interior anchor of a building (where work happens).
    pub fn anchor(&self, kind: BuildingKind) -> Vec2 {
        self.building(kind)
            .map(|b| b.rect.center())
            .unwrap_or_default()
    }

    /// The bed, inside the house and aligned with its door.
    pub fn bed(&self) -> Vec2 {
        match self.building(BuildingKind::House) {
            Some(b) => Vec2::new(b.rect.center().x, b.rect.min.y + 1.5),
            None => Vec2::default(),
        }
    }

    /// The fireplace corner of the house.
    pub fn fireplace(&self) -> Vec2 {
        match self.building(BuildingKind::House) {
            Some(b) => Vec2::new(b.rect.max.x - 1.5, b.rect.min.y + 1.5),
            None => Vec2::default(),
        }
    }

    /// The open north entrance of the pasture.
    pub fn pasture_gate(&self) -> Vec2 {
        Vec2::new(
            (self.pasture.min.x + self.pasture.max.x) * 0.5,
            self.pasture.min.y - 0.5,
        )
    }

    /// Next waypoint on the way from `from` to `to`.
    ///
    /// Greedy steering cannot round a wall from the far side, so whenever the
    /// two endpoints lie on opposite sides of a building's wall band (or the
    /// fenced pasture) the walk is routed through the door (or the gate)
    /// first. Once the walker is close to that opening it heads straight for
    /// the real target, which carries it through the gap.
    pub fn route_waypoint(&self, cfg: &SimConfig, from: Vec2, to: Vec2) -> Vec2 {
        for b in &self.buildings {
            if b.kind == BuildingKind::Well {
                continue;
            }
            let zone = b.rect.expand(cfg.wall_band);
            if zone.contains(from) == zone.contains(to) {
                continue;
            }
            let door = b.door_center(cfg);
            if from.distance(door) > cfg.near_radius {
                return door;
            }
        }

        // Fence tiles extend one tile beyond the pasture rect on the walled
        // sides.
        let fenced = Rect::new(
            Vec2::new(self.pasture.min.x - 1.0, self.pasture.min.y),
            Vec2::new(self.pasture.max.x + 1.0, self.pasture.max.y),
        );
        if fenced.contains(from) != fenced.contains(to) {
            let gate = self.pasture_gate();
            if from.distance(gate) > cfg.near_radius {
                return gate;
            }
        }

        to
    }

    /// Wall-collision test for a point.
    pub fn is_blocked(&self, cfg: &SimConfig, p: Vec2) -> bool {
        if !self.bounds.contains(p) {
            return true;
        }
        if self.pond.contains(p) {
            return true;
        }
        let tile = p.tile();
        if self.fences.contains(&tile) {
            return true;
        }
        self.buildings.iter().any(|b| b.blocks(p, cfg))
    }

    fn nearest_by<F>(
        &self,
        from: Vec2,
        candidates: impl Iterator<Item = (usize, Vec2)>,
        claimed_by_other: F,
    ) -> Option<usize>
    where
        F: Fn(usize) -> bool,
    {
        // Rank by (claimed-by-other, distance): unclaimed work first, then
        // nearest. Claimed candidates stay eligible as a fallback.
        let mut best: Option<(bool, f32, usize)> = None;
        for (i, pos) in candidates {
            let claimed = claimed_by_other(i);
            let dist = from.distance(pos);
            let better = match &best {
                None => true,
                Some((best_claimed, best_dist, _)) => (claimed, dist) < (*best_claimed, *best_dist),
            };
            if better {
                best = Some((claimed, dist, i));
            }
        }
        best.map(|(_, _, i)| i)
    }

    /// Nearest field in `state`, preferring fields no other villager has
    /// claimed. Claims are advisory: a claimed field still wins when it is
    /// the only candidate.
    pub fn nearest_field(
        &self,
        from: Vec2,
        want: FieldState,
        villagers: &[Villager],
        me: usize,
    ) -> Option<usize> {
        self.nearest_by(
            from,
            self.fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.state == want)
                .map(|(i, f)| (i, f.center)),
            |i| {
                villagers
                    .iter()
                    .enumerate()
                    .any(|(j, v)| j != me && v.claim.field == Some(i))
            },
        )
    }

    pub fn nearest_field_needing_water(
        &self,
        from: Vec2,
        villagers: &[Villager],
        me: usize,
    ) -> Option<usize> {
        self.nearest_by(
            from,
            self.fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.needs_water())
                .map(|(i, f)| (i, f.center)),
            |i| {
                villagers
                    .iter()
                    .enumerate()
                    .any(|(j, v)| j != me && v.claim.field == Some(i))
            },
        )
    }

    pub fn nearest_grown_tree(
        &self,
        from: Vec2,
        villagers: &[Villager],
        me: usize,
    ) -> Option<usize> {
        self.nearest_by(
            from,
            self.trees
                .iter()
                .enumerate()
                .filter(|(_, t)| t.state == TreeState::Grown)
                .map(|(i, t)| (i, t.pos)),
            |i| {
                villagers
                    .iter()
                    .enumerate()
                    .any(|(j, v)| j != me && v.claim.tree == Some(i))
            },
        )
    }

    pub fn nearest_woolly_sheep(
        &self,
        from: Vec2,
        villagers: &[Villager],
        me: usize,
    ) -> Option<usize> {
        self.nearest_by(
            from,
            self.sheep
                .iter()
                .enumerate()
                .filter(|(_, s)| s.has_wool)
                .map(|(i, s)| (i, s.pos)),
            |i| {
                villagers
                    .iter()
                    .enumerate()
                    .any(|(j, v)| j != me && v.claim.sheep == Some(i))
            },
        )
    }

    /// Start a fire in the given building. No-op for the well and while
    /// another outbreak is active.
    pub fn ignite(&mut self, building: usize, cfg: &SimConfig) {
        if self.fire.is_some() {
            return;
        }
        let Some(b) = self.buildings.get(building) else {
            return;
        };
        if b.kind == BuildingKind::Well {
            return;
        }
        self.fire = Some(FireOutbreak {
            building,
            pos: b.door_center(cfg),
            progress: 0.0,
            intensity: cfg.fire_intensity,
        });
    }

    /// Natural per-tick processes, applied before any villager acts.
    pub fn advance(
        &mut self,
        ctx: &TickContext,
        cfg: &SimConfig,
        growth_allowed: bool,
        trace: &mut TraceLog,
    ) {
        let dt = ctx.dt_seconds;

        for (i, field) in self.fields.iter_mut().enumerate() {
            if field.watered {
                field.water_timer -= dt;
                if field.water_timer <= 0.0 {
                    field.water_timer = 0.0;
                    field.watered = false;
                }
            }
            match field.state {
                FieldState::Planted if field.watered => {
                    field.state = FieldState::Growing;
                }
                FieldState::Growing if field.watered && growth_allowed => {
                    field.growth_timer -= dt;
                    if field.growth_timer <= 0.0 {
                        field.growth_timer = 0.0;
                        field.state = FieldState::Ready;
                        trace.push(TraceEvent::new(ctx.tick, "field.ready").with_a(i as u64));
                    }
                }
                _ => {}
            }
        }

        for tree in &mut self.trees {
            if tree.state == TreeState::Regrowing {
                tree.regrow_timer -= dt;
                if tree.regrow_timer <= 0.0 {
                    tree.regrow_timer = 0.0;
                    tree.state = TreeState::Grown;
                }
            }
        }

        let pen = self.pasture.expand(-0.5);
        for (i, sheep) in self.sheep.iter_mut().enumerate() {
            if !sheep.has_wool {
                sheep.wool_timer -= dt;
                if sheep.wool_timer <= 0.0 {
                    sheep.wool_timer = 0.0;
                    sheep.has_wool = true;
                }
            }

            sheep.dwell_timer -= dt;
            if sheep.dwell_timer <= 0.0 || sheep.pos.distance(sheep.wander_target) <= 0.1 {
                let mut rng = ctx.rng_for_stream(streams::SHEEP_WANDER.wrapping_add(i as u64));
                let r = cfg.sheep_wander_radius;
                let offset = Vec2::new(rng.range_f32(-r, r), rng.range_f32(-r, r));
                sheep.wander_target = pen.clamp_point(sheep.pos + offset);
                sheep.dwell_timer = rng.range_f32(cfg.sheep_dwell_min, cfg.sheep_dwell_max);
            }

            let to = sheep.wander_target - sheep.pos;
            let dist = to.length();
            let step = cfg.sheep_wander_speed * dt;
            if dist > f32::EPSILON {
                sheep.pos = if step >= dist {
                    sheep.wander_target
                } else {
                    sheep.pos + to * (step / dist)
                };
            }
        }

        match &self.fire {
            Some(fire) if fire.progress >= cfg.extinguish_threshold || fire.intensity <= 0.0 => {
                trace.push(TraceEvent::new(ctx.tick, "fire.out").with_a(fire.building as u64));
                self.fire = None;
            }
            Some(_) => {}
            None => {
                let mut rng = ctx.rng_for_stream(streams::FIRE_IGNITION);
                if rng.chance(cfg.fire_ignition_chance) {
                    let flammable: Vec<usize> = self
                        .buildings
                        .iter()
                        .enumerate()
                        .filter(|(_, b)| b.kind != BuildingKind::Well)
                        .map(|(i, _)| i)
                        .collect();
                    if !flammable.is_empty() {
                        let pick = flammable[rng.range_usize(flammable.len())];
                        self.ignite(pick, cfg);
                        trace.push(TraceEvent::new(ctx.tick, "fire.ignited").with_a(pick as u64));
                    }
                }
            }
        }
    }
}
