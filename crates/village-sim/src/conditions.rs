use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::economy::{Global, ItemKind};
use crate::villager::Villager;
use crate::world::{FieldState, TreeState, World};

/// The condition vocabulary: pure predicates over agent, world, and global
/// state. Conditions never mutate anything and never report `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    IsTired,
    IsHungry,
    IsCold,
    IsNight,
    IsWinter,
    BreadAvailable,
    CookedFishAvailable,
    FireplaceLit,
    FireplaceNeedsFuel,
    WheatStored,
    WoodStored,
    WoolStored,
    FishStored,
    SweaterAvailable,
    WearingSweater,
    CarryingNothing,
    Carrying(ItemKind),
    EmptyFieldExists,
    FieldNeedsWaterExists,
    FieldReadyExists,
    GrownTreeExists,
    WoollySheepExists,
    FireActive,
    HasWater,
}

/// Editor vocabulary: every condition an external tree editor may offer.
pub const ALL_CONDITIONS: &[Condition] = &[
    Condition::IsTired,
    Condition::IsHungry,
    Condition::IsCold,
    Condition::IsNight,
    Condition::IsWinter,
    Condition::BreadAvailable,
    Condition::CookedFishAvailable,
    Condition::FireplaceLit,
    Condition::FireplaceNeedsFuel,
    Condition::WheatStored,
    Condition::WoodStored,
    Condition::WoolStored,
    Condition::FishStored,
    Condition::SweaterAvailable,
    Condition::WearingSweater,
    Condition::CarryingNothing,
    Condition::Carrying(ItemKind::Wheat),
    Condition::Carrying(ItemKind::Flour),
    Condition::Carrying(ItemKind::Wood),
    Condition::Carrying(ItemKind::Wool),
    Condition::Carrying(ItemKind::Fish),
    Condition::EmptyFieldExists,
    Condition::FieldNeedsWaterExists,
    Condition::FieldReadyExists,
    Condition::GrownTreeExists,
    Condition::WoollySheepExists,
    Condition::FireActive,
    Condition::HasWater,
];

impl Condition {
    pub fn name(self) -> &'static str {
        match self {
            Condition::IsTired => "is_tired",
            Condition::IsHungry => "is_hungry",
            Condition::IsCold => "is_cold",
            Condition::IsNight => "is_night",
            Condition::IsWinter => "is_winter",
            Condition::BreadAvailable => "bread_available",
            Condition::CookedFishAvailable => "cooked_fish_available",
            Condition::FireplaceLit => "fireplace_lit",
            Condition::FireplaceNeedsFuel => "fireplace_needs_fuel",
            Condition::WheatStored => "wheat_stored",
            Condition::WoodStored => "wood_stored",
            Condition::WoolStored => "wool_stored",
            Condition::FishStored => "fish_stored",
            Condition::SweaterAvailable => "sweater_available",
            Condition::WearingSweater => "wearing_sweater",
            Condition::CarryingNothing => "carrying_nothing",
            Condition::Carrying(ItemKind::Wheat) => "carrying_wheat",
            Condition::Carrying(ItemKind::Flour) => "carrying_flour",
            Condition::Carrying(ItemKind::Bread) => "carrying_bread",
            Condition::Carrying(ItemKind::Wood) => "carrying_wood",
            Condition::Carrying(ItemKind::Wool) => "carrying_wool",
            Condition::Carrying(ItemKind::Sweater) => "carrying_sweater",
            Condition::Carrying(ItemKind::Fish) => "carrying_fish",
            Condition::Carrying(ItemKind::CookedFish) => "carrying_cooked_fish",
            Condition::EmptyFieldExists => "empty_field_exists",
            Condition::FieldNeedsWaterExists => "field_needs_water_exists",
            Condition::FieldReadyExists => "field_ready_exists",
            Condition::GrownTreeExists => "grown_tree_exists",
            Condition::WoollySheepExists => "woolly_sheep_exists",
            Condition::FireActive => "fire_active",
            Condition::HasWater => "has_water",
        }
    }

    pub fn from_name(name: &str) -> Option<Condition> {
        ALL_CONDITIONS.iter().copied().find(|c| c.name() == name)
    }

    pub fn eval(self, v: &Villager, world: &World, global: &Global, cfg: &SimConfig) -> bool {
        match self {
            Condition::IsTired => v.energy < cfg.tired_threshold,
            Condition::IsHungry => v.hunger < cfg.hungry_threshold,
            Condition::IsCold => v.warmth < cfg.cold_threshold,
            Condition::IsNight => global.is_night(cfg),
            Condition::IsWinter => !global.season(cfg).growth_allowed(),
            Condition::BreadAvailable => global.bread > 0,
            Condition::CookedFishAvailable => global.cooked_fish > 0,
            Condition::FireplaceLit => global.fireplace_lit,
            Condition::FireplaceNeedsFuel => global.fireplace_fuel < cfg.fireplace_low_fuel,
            Condition::WheatStored => global.wheat >= cfg.wheat_per_flour,
            Condition::WoodStored => global.wood > 0,
            Condition::WoolStored => global.wool > 0,
            Condition::FishStored => global.fish > 0,
            Condition::SweaterAvailable => global.sweaters > 0,
            Condition::WearingSweater => v.wearing_sweater,
            Condition::CarryingNothing => v.inventory.is_none(),
            Condition::Carrying(kind) => v.carrying(kind) > 0,
            Condition::EmptyFieldExists => {
                world.fields.iter().any(|f| f.state == FieldState::Empty)
            }
            Condition::FieldNeedsWaterExists => world.fields.iter().any(|f| f.needs_water()),
            Condition::FieldReadyExists => {
                world.fields.iter().any(|f| f.state == FieldState::Ready)
            }
            Condition::GrownTreeExists => {
                world.trees.iter().any(|t| t.state == TreeState::Grown)
            }
            Condition::WoollySheepExists => world.sheep.iter().any(|s| s.has_wool),
            Condition::FireActive => world.fire.is_some(),
            Condition::HasWater => v.has_water,
        }
    }
}
