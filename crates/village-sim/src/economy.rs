use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Kinds of goods a villager can carry and the village can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Wheat,
    Flour,
    Bread,
    Wood,
    Wool,
    Sweater,
    Fish,
    CookedFish,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Wheat => "wheat",
            ItemKind::Flour => "flour",
            ItemKind::Bread => "bread",
            ItemKind::Wood => "wood",
            ItemKind::Wool => "wool",
            ItemKind::Sweater => "sweater",
            ItemKind::Fish => "fish",
            ItemKind::CookedFish => "cooked_fish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_day(day: u32, season_length_days: u32) -> Self {
        match (day / season_length_days.max(1)) % 4 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Warmth a villager drifts toward outdoors, without sweater or fire.
    pub fn ambient_warmth(self) -> f32 {
        match self {
            Season::Spring => 60.0,
            Season::Summer => 80.0,
            Season::Autumn => 50.0,
            Season::Winter => 20.0,
        }
    }

    pub fn growth_allowed(self) -> bool {
        self != Season::Winter
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Cumulative production counters, used for objectives and status panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub crops_harvested: u32,
    pub bread_baked: u32,
    pub wood_chopped: u32,
    pub sweaters_knitted: u32,
    pub fish_cooked: u32,
}

/// The shared village economy and clock.
///
/// Owned by the orchestrator and mutated by any villager's actions; together
/// with the world collections this is the only cross-agent shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub wheat: u32,
    pub flour: u32,
    pub bread: u32,
    pub wood: u32,
    pub wool: u32,
    pub sweaters: u32,
    pub fish: u32,
    pub cooked_fish: u32,

    pub fireplace_lit: bool,
    pub fireplace_fuel: f32,

    /// Fraction of the current day in `[0, 1)`.
    pub time_of_day: f32,
    pub day: u32,

    pub totals: Totals,
}

impl Default for Global {
    fn default() -> Self {
        Self {
            wheat: 0,
            flour: 0,
            bread: 2,
            wood: 1,
            wool: 0,
            sweaters: 0,
            fish: 0,
            cooked_fish: 0,
            fireplace_lit: false,
            fireplace_fuel: 0.0,
            time_of_day: 0.0,
            day: 0,
            totals: Totals::default(),
        }
    }
}

impl Global {
    /// Advance the clock and burn fireplace fuel. Returns `true` when a new
    /// day starts.
    pub fn advance(&mut self, cfg: &SimConfig, dt: f32) -> bool {
        self.time_of_day += dt / cfg.day_length.max(f32::EPSILON);
        let mut new_day = false;
        if self.time_of_day >= 1.0 {
            self.time_of_day -= 1.0;
            self.day += 1;
            new_day = true;
        }

        if self.fireplace_lit {
            self.fireplace_fuel -= cfg.fireplace_burn_rate * dt;
            if self.fireplace_fuel <= 0.0 {
                self.fireplace_fuel = 0.0;
                self.fireplace_lit = false;
            }
        }

        new_day
    }

    pub fn season(&self, cfg: &SimConfig) -> Season {
        Season::from_day(self.day, cfg.season_length_days)
    }

    pub fn is_night(&self, cfg: &SimConfig) -> bool {
        self.time_of_day >= cfg.night_start
    }
}
