use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Every tuned constant of the simulation.
///
/// The defaults are the empirically tuned values; they are configuration to
/// be preserved, not re-derived. Radii and band widths in particular interact
/// with the greedy movement heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // Fixed step
    pub tick_seconds: f32,

    // Movement
    pub walk_speed: f32,
    pub arrival_epsilon: f32,
    pub near_radius: f32,
    pub slowdown_threshold: f32,
    pub slowdown_factor: f32,
    pub move_energy_cost: f32,

    // Geometry
    pub wall_band: f32,
    pub door_width: f32,

    // Vitals
    pub energy_drain: f32,
    pub hunger_drain: f32,
    pub warmth_drift: f32,
    pub sweater_bonus: f32,
    pub fireplace_warmth: f32,
    pub fireplace_radius: f32,
    pub tired_threshold: f32,
    pub hungry_threshold: f32,
    pub cold_threshold: f32,
    pub sleep_restore: f32,
    pub warmup_rate: f32,
    pub warm_enough: f32,
    pub bread_restore: f32,
    pub fish_restore: f32,

    // Clock & seasons
    pub day_length: f32,
    pub night_start: f32,
    pub season_length_days: u32,

    // Farming
    pub crop_grow_time: f32,
    pub water_duration: f32,

    // Regrowth
    pub tree_regrow_time: f32,
    pub wool_regrow_time: f32,

    // Sheep
    pub sheep_wander_radius: f32,
    pub sheep_wander_speed: f32,
    pub sheep_dwell_min: f32,
    pub sheep_dwell_max: f32,

    // Action durations
    pub grind_duration: f32,
    pub bake_duration: f32,
    pub chop_duration: f32,
    pub shear_duration: f32,
    pub knit_duration: f32,
    pub cook_duration: f32,
    pub fish_min_duration: f32,
    pub fish_give_up_factor: f32,
    pub fish_success_chance: f32,
    pub action_energy_cost: f32,

    // Economy ratios
    pub wheat_per_flour: u32,
    pub flour_per_bread: u32,

    // Fire
    pub fire_ignition_chance: f32,
    pub fire_intensity: f32,
    pub extinguish_amount: f32,
    pub extinguish_threshold: f32,
    pub fireplace_fuel_per_log: f32,
    pub fireplace_burn_rate: f32,
    pub fireplace_low_fuel: f32,

    // Objectives
    pub survive_days_goal: u32,
    pub bread_goal: u32,
    pub sweater_goal: u32,
    pub fish_goal: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.1,

            walk_speed: 2.5,
            arrival_epsilon: 0.15,
            near_radius: 1.2,
            slowdown_threshold: 20.0,
            slowdown_factor: 0.5,
            move_energy_cost: 0.5,

            wall_band: 0.35,
            door_width: 1.4,

            energy_drain: 0.15,
            hunger_drain: 0.3,
            warmth_drift: 0.05,
            sweater_bonus: 20.0,
            fireplace_warmth: 90.0,
            fireplace_radius: 3.0,
            tired_threshold: 25.0,
            hungry_threshold: 35.0,
            cold_threshold: 30.0,
            sleep_restore: 10.0,
            warmup_rate: 15.0,
            warm_enough: 80.0,
            bread_restore: 35.0,
            fish_restore: 30.0,

            day_length: 120.0,
            night_start: 0.75,
            season_length_days: 3,

            crop_grow_time: 20.0,
            water_duration: 15.0,

            tree_regrow_time: 40.0,
            wool_regrow_time: 30.0,

            sheep_wander_radius: 2.0,
            sheep_wander_speed: 0.6,
            sheep_dwell_min: 2.0,
            sheep_dwell_max: 6.0,

            grind_duration: 3.0,
            bake_duration: 4.0,
            chop_duration: 5.0,
            shear_duration: 3.0,
            knit_duration: 6.0,
            cook_duration: 3.0,
            fish_min_duration: 2.0,
            fish_give_up_factor: 4.0,
            fish_success_chance: 0.15,
            action_energy_cost: 2.0,

            wheat_per_flour: 3,
            flour_per_bread: 1,

            fire_ignition_chance: 0.0008,
            fire_intensity: 100.0,
            extinguish_amount: 25.0,
            extinguish_threshold: 100.0,
            fireplace_fuel_per_log: 20.0,
            fireplace_burn_rate: 1.0,
            fireplace_low_fuel: 5.0,

            survive_days_goal: 3,
            bread_goal: 10,
            sweater_goal: 3,
            fish_goal: 5,
        }
    }
}

impl SimConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
