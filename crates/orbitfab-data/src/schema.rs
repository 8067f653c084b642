//! Serde structs for scenario files.
//!
//! These define the on-disk format of a scenario. They are deserialized from
//! RON, JSON, or TOML and then resolved into a
//! [`Scenario`](crate::scenario::Scenario) by the loader.

use std::collections::BTreeMap;

use orbitfab_core::command::FactoryCommand;
use orbitfab_core::facility::FacilityType;
use orbitfab_core::recipe::RecipeId;
use serde::{Deserialize, Serialize};

// ===========================================================================
// Scenario
// ===========================================================================

/// A scenario definition in a data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Starting stock keyed by resource name. Omitted means the default
    /// starting inventory; listed resources replace it entirely.
    #[serde(default)]
    pub inventory: Option<BTreeMap<String, f64>>,
    /// Overrides for individual facility types. Types not listed keep one
    /// level-1 line running their default recipe.
    #[serde(default)]
    pub facilities: Vec<FacilityData>,
    #[serde(default = "default_target")]
    pub target_units_per_month: f64,
    #[serde(default = "default_tick_days")]
    pub tick_days: f64,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    #[serde(default)]
    pub schedule: Vec<ScheduledCommand>,
}

fn default_target() -> f64 {
    1.0
}

fn default_tick_days() -> f64 {
    1.0
}

fn default_ticks() -> u32 {
    30
}

// ===========================================================================
// Facilities
// ===========================================================================

/// One facility override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityData {
    pub facility: FacilityType,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    /// Defaults to the facility type's default recipe.
    #[serde(default)]
    pub recipe: Option<RecipeId>,
}

fn default_count() -> u32 {
    1
}

fn default_level() -> u32 {
    1
}

fn default_efficiency() -> f64 {
    1.0
}

// ===========================================================================
// Schedule
// ===========================================================================

/// A command applied just before the tick with index `at_tick` (0-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub at_tick: u32,
    pub command: FactoryCommand,
}
