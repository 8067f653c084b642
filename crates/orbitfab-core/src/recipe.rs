//! The static recipe catalog.
//!
//! [`RECIPES`] is a read-only table built at compile time and shared by
//! reference. There is no runtime mutation path; which recipe a facility runs
//! is chosen through its [`ActiveRecipe`](crate::state::ActiveRecipe) binding.

use serde::{Deserialize, Serialize};

use crate::facility::{Facility, FacilityType, throughput_multiplier};
use crate::resource::ResourceId;

/// Days in the nominal month that batch rates are quoted against.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Sparse per-batch quantities, ordered by resource.
pub type ResourceAmounts = &'static [(ResourceId, f64)];

/// Identifies a recipe in [`RECIPES`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RecipeId {
    MakeChips,
    BuildRacks,
    BuildPodShells,
    IntegratePods,
    ProduceFuel,
    PrepareLaunch,
}

impl RecipeId {
    pub const COUNT: usize = 6;

    pub const ALL: [RecipeId; Self::COUNT] = [
        RecipeId::MakeChips,
        RecipeId::BuildRacks,
        RecipeId::BuildPodShells,
        RecipeId::IntegratePods,
        RecipeId::ProduceFuel,
        RecipeId::PrepareLaunch,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The catalog entry for this id.
    #[inline]
    pub fn recipe(self) -> &'static Recipe {
        recipe(self)
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.recipe().label)
    }
}

/// An immutable production recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub label: &'static str,
    /// The only facility type allowed to run this recipe.
    pub facility: FacilityType,
    /// Days to finish one batch at multiplier 1.
    pub duration_days: f64,
    pub inputs: ResourceAmounts,
    pub outputs: ResourceAmounts,
    /// Finished units credited per batch. These are counters on the state,
    /// not inventory.
    pub units_per_batch: f64,
}

impl Recipe {
    /// Theoretical batches per month for `facility`, ignoring inventory.
    pub fn batches_per_month(&self, facility: &Facility) -> f64 {
        (DAYS_PER_MONTH / self.duration_days) * throughput_multiplier(facility)
    }

    /// Per-batch requirement of `resource`, or 0 if it is not an input.
    pub fn input(&self, resource: ResourceId) -> f64 {
        lookup(self.inputs, resource)
    }

    /// Per-batch yield of `resource`, or 0 if it is not an output.
    pub fn output(&self, resource: ResourceId) -> f64 {
        lookup(self.outputs, resource)
    }
}

fn lookup(amounts: ResourceAmounts, resource: ResourceId) -> f64 {
    amounts
        .iter()
        .find(|(r, _)| *r == resource)
        .map(|(_, q)| *q)
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Every recipe, indexed by [`RecipeId::index`].
pub static RECIPES: [Recipe; RecipeId::COUNT] = [
    Recipe {
        id: RecipeId::MakeChips,
        label: "Fabricate AI chips",
        facility: FacilityType::ChipFab,
        duration_days: 10.0,
        inputs: &[(ResourceId::Cash, 5.0)],
        outputs: &[(ResourceId::Chips, 10.0)],
        units_per_batch: 0.0,
    },
    Recipe {
        id: RecipeId::BuildRacks,
        label: "Assemble racks",
        facility: FacilityType::RackLine,
        duration_days: 5.0,
        inputs: &[(ResourceId::Cash, 2.0), (ResourceId::Chips, 5.0)],
        outputs: &[(ResourceId::Racks, 5.0)],
        units_per_batch: 0.0,
    },
    Recipe {
        id: RecipeId::BuildPodShells,
        label: "Build pod shells",
        facility: FacilityType::PodFactory,
        duration_days: 6.0,
        inputs: &[(ResourceId::Cash, 6.0), (ResourceId::Racks, 5.0)],
        outputs: &[(ResourceId::PodShells, 1.0)],
        units_per_batch: 0.0,
    },
    Recipe {
        id: RecipeId::IntegratePods,
        label: "Integrate compute pods",
        facility: FacilityType::PodFactory,
        duration_days: 8.0,
        inputs: &[
            (ResourceId::Cash, 10.0),
            (ResourceId::Chips, 10.0),
            (ResourceId::PodShells, 1.0),
        ],
        outputs: &[],
        units_per_batch: 1.0,
    },
    Recipe {
        id: RecipeId::ProduceFuel,
        label: "Produce launch fuel",
        facility: FacilityType::FuelDepot,
        duration_days: 4.0,
        inputs: &[(ResourceId::Cash, 1.0)],
        outputs: &[(ResourceId::Fuel, 10.0)],
        units_per_batch: 0.0,
    },
    Recipe {
        id: RecipeId::PrepareLaunch,
        label: "Prepare launch slot",
        facility: FacilityType::LaunchComplex,
        duration_days: 7.0,
        inputs: &[(ResourceId::Cash, 5.0), (ResourceId::Fuel, 10.0)],
        outputs: &[(ResourceId::LaunchSlots, 1.0)],
        units_per_batch: 0.0,
    },
];

/// Look up a recipe by id.
#[inline]
pub fn recipe(id: RecipeId) -> &'static Recipe {
    &RECIPES[id.index()]
}

/// Recipes a facility type is allowed to run.
pub fn recipes_for(facility: FacilityType) -> impl Iterator<Item = &'static Recipe> {
    RECIPES.iter().filter(move |r| r.facility == facility)
}

/// The recipe a facility type is bound to when a factory is created.
pub fn default_recipe(facility: FacilityType) -> RecipeId {
    match facility {
        FacilityType::ChipFab => RecipeId::MakeChips,
        FacilityType::RackLine => RecipeId::BuildRacks,
        FacilityType::PodFactory => RecipeId::BuildPodShells,
        FacilityType::FuelDepot => RecipeId::ProduceFuel,
        FacilityType::LaunchComplex => RecipeId::PrepareLaunch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_id() {
        for id in RecipeId::ALL {
            assert_eq!(recipe(id).id, id);
        }
    }

    #[test]
    fn durations_are_positive() {
        for r in &RECIPES {
            assert!(r.duration_days > 0.0, "{} has no duration", r.label);
        }
    }

    #[test]
    fn amounts_are_sorted_and_positive() {
        for r in &RECIPES {
            for amounts in [r.inputs, r.outputs] {
                assert!(amounts.windows(2).all(|w| w[0].0 < w[1].0), "{}", r.label);
                assert!(amounts.iter().all(|(_, q)| *q > 0.0), "{}", r.label);
            }
        }
    }

    #[test]
    fn default_recipes_belong_to_their_facility() {
        for t in FacilityType::ALL {
            assert_eq!(recipe(default_recipe(t)).facility, t);
        }
    }

    #[test]
    fn only_integration_completes_units() {
        for r in &RECIPES {
            if r.id == RecipeId::IntegratePods {
                assert_eq!(r.units_per_batch, 1.0);
                assert!(r.outputs.is_empty());
            } else {
                assert_eq!(r.units_per_batch, 0.0);
            }
        }
    }

    #[test]
    fn pod_factory_has_two_recipes() {
        let ids: Vec<RecipeId> = recipes_for(FacilityType::PodFactory).map(|r| r.id).collect();
        assert_eq!(ids, vec![RecipeId::BuildPodShells, RecipeId::IntegratePods]);
    }

    #[test]
    fn input_and_output_lookup() {
        let racks = recipe(RecipeId::BuildRacks);
        assert_eq!(racks.input(ResourceId::Chips), 5.0);
        assert_eq!(racks.input(ResourceId::Fuel), 0.0);
        assert_eq!(racks.output(ResourceId::Racks), 5.0);
    }

    #[test]
    fn batches_per_month_single_line() {
        let chips = recipe(RecipeId::MakeChips);
        assert_eq!(chips.batches_per_month(&Facility::with_lines(1)), 3.0);
        assert_eq!(chips.batches_per_month(&Facility::idle()), 0.0);
    }
}
