//! The factory aggregate: inventory, facilities, recipe bindings, counters.

use serde::{Deserialize, Serialize};

use crate::facility::{Facility, FacilityType, PerFacility};
use crate::recipe::{Recipe, RecipeId, default_recipe};
use crate::resource::{Inventory, ResourceId, STARTING_CASH};

/// Which recipe a facility type is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveRecipe {
    pub recipe: RecipeId,
    /// Partial-cycle progress. Ticks preserve it but do not advance it; batch
    /// counts are computed from rate and elapsed time alone.
    pub progress_days: f64,
}

impl ActiveRecipe {
    pub fn new(recipe: RecipeId) -> Self {
        Self {
            recipe,
            progress_days: 0.0,
        }
    }
}

/// Complete simulation state. Every tick consumes one and returns a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryState {
    pub inventory: Inventory,
    pub facilities: PerFacility<Facility>,
    pub active_recipes: PerFacility<ActiveRecipe>,
    /// Units completed since the factory was created.
    pub units_built_total: f64,
    /// Completed units waiting for launch.
    pub units_ready_on_ground: f64,
    /// Units completed by the tick that produced this state.
    pub units_built_this_tick: f64,
}

impl FactoryState {
    /// Zero inventory, no lines anywhere, default recipes bound.
    pub fn empty() -> Self {
        Self {
            inventory: Inventory::new(),
            facilities: PerFacility::from_fn(|_| Facility::idle()),
            active_recipes: PerFacility::from_fn(|t| ActiveRecipe::new(default_recipe(t))),
            units_built_total: 0.0,
            units_ready_on_ground: 0.0,
            units_built_this_tick: 0.0,
        }
    }

    #[inline]
    pub fn facility(&self, facility: FacilityType) -> &Facility {
        &self.facilities[facility]
    }

    #[inline]
    pub fn active_recipe(&self, facility: FacilityType) -> &ActiveRecipe {
        &self.active_recipes[facility]
    }

    /// The catalog entry the facility is bound to.
    pub fn bound_recipe(&self, facility: FacilityType) -> &'static Recipe {
        self.active_recipes[facility].recipe.recipe()
    }

    pub fn resource(&self, resource: ResourceId) -> f64 {
        self.inventory[resource]
    }
}

impl Default for FactoryState {
    fn default() -> Self {
        create_default_state()
    }
}

/// The starting factory: [`STARTING_CASH`], nothing else in stock, and one
/// level-1 line at full efficiency for every facility type.
pub fn create_default_state() -> FactoryState {
    FactoryState {
        inventory: Inventory::new().with(ResourceId::Cash, STARTING_CASH),
        facilities: PerFacility::from_fn(|_| Facility::with_lines(1)),
        ..FactoryState::empty()
    }
}
