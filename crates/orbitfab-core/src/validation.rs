//! Invariant checks and state comparison.
//!
//! [`check_invariants`] flags anything a well-formed tick should never
//! produce. [`diff_states`] compares two states field by field to locate
//! where two runs diverged.

use crate::facility::FacilityType;
use crate::recipe::RecipeId;
use crate::resource::ResourceId;
use crate::state::FactoryState;

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

/// A broken state invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// A resource is negative or not finite.
    BadInventory { resource: ResourceId, quantity: f64 },
    /// Upgrade level below 1.
    LevelBelowOne { facility: FacilityType },
    /// Efficiency outside `[0, 1]` or not finite.
    EfficiencyOutOfRange { facility: FacilityType, efficiency: f64 },
    /// A facility is bound to a recipe it cannot run.
    RecipeMismatch { facility: FacilityType, recipe: RecipeId },
    /// A unit counter is negative or not finite.
    BadCounter { name: &'static str, value: f64 },
}

/// Every invariant `state` breaks. Empty for a well-formed state.
pub fn check_invariants(state: &FactoryState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (resource, quantity) in state.inventory.iter() {
        if !(quantity.is_finite() && quantity >= 0.0) {
            violations.push(InvariantViolation::BadInventory { resource, quantity });
        }
    }

    for (facility, f) in state.facilities.iter() {
        if f.level < 1 {
            violations.push(InvariantViolation::LevelBelowOne { facility });
        }
        if !(0.0..=1.0).contains(&f.efficiency) {
            violations.push(InvariantViolation::EfficiencyOutOfRange {
                facility,
                efficiency: f.efficiency,
            });
        }
    }

    for (facility, active) in state.active_recipes.iter() {
        if active.recipe.recipe().facility != facility {
            violations.push(InvariantViolation::RecipeMismatch {
                facility,
                recipe: active.recipe,
            });
        }
    }

    for (name, value) in [
        ("units_built_total", state.units_built_total),
        ("units_ready_on_ground", state.units_ready_on_ground),
        ("units_built_this_tick", state.units_built_this_tick),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            violations.push(InvariantViolation::BadCounter { name, value });
        }
    }

    violations
}

// ---------------------------------------------------------------------------
// State diff
// ---------------------------------------------------------------------------

/// One field that differs between two states.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDiff {
    Resource { resource: ResourceId, a: f64, b: f64 },
    Facility { facility: FacilityType, description: String },
    Binding { facility: FacilityType, a: RecipeId, b: RecipeId },
    Counter { name: &'static str, a: f64, b: f64 },
}

/// Full diff between two states.
#[derive(Debug, Clone)]
pub struct StateDiff {
    pub is_identical: bool,
    pub diffs: Vec<FieldDiff>,
}

/// Compare two states. Floats are compared by bit pattern, so this reports
/// the slightest divergence between replays.
pub fn diff_states(a: &FactoryState, b: &FactoryState) -> StateDiff {
    let mut diffs = Vec::new();

    for resource in ResourceId::ALL {
        let (qa, qb) = (a.inventory[resource], b.inventory[resource]);
        if qa.to_bits() != qb.to_bits() {
            diffs.push(FieldDiff::Resource { resource, a: qa, b: qb });
        }
    }

    for facility in FacilityType::ALL {
        let (fa, fb) = (a.facility(facility), b.facility(facility));
        let mut mismatches = Vec::new();
        if fa.count != fb.count {
            mismatches.push("count");
        }
        if fa.level != fb.level {
            mismatches.push("level");
        }
        if fa.efficiency.to_bits() != fb.efficiency.to_bits() {
            mismatches.push("efficiency");
        }
        let (ra, rb) = (a.active_recipe(facility), b.active_recipe(facility));
        if ra.progress_days.to_bits() != rb.progress_days.to_bits() {
            mismatches.push("progress_days");
        }
        if !mismatches.is_empty() {
            diffs.push(FieldDiff::Facility {
                facility,
                description: mismatches.join(", "),
            });
        }
        if ra.recipe != rb.recipe {
            diffs.push(FieldDiff::Binding {
                facility,
                a: ra.recipe,
                b: rb.recipe,
            });
        }
    }

    for (name, ca, cb) in [
        ("units_built_total", a.units_built_total, b.units_built_total),
        (
            "units_ready_on_ground",
            a.units_ready_on_ground,
            b.units_ready_on_ground,
        ),
        (
            "units_built_this_tick",
            a.units_built_this_tick,
            b.units_built_this_tick,
        ),
    ] {
        if ca.to_bits() != cb.to_bits() {
            diffs.push(FieldDiff::Counter { name, a: ca, b: cb });
        }
    }

    StateDiff {
        is_identical: diffs.is_empty(),
        diffs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Facility;
    use crate::state::{ActiveRecipe, create_default_state};

    #[test]
    fn default_state_is_valid() {
        assert!(check_invariants(&create_default_state()).is_empty());
        assert!(check_invariants(&FactoryState::empty()).is_empty());
    }

    #[test]
    fn negative_inventory_flagged() {
        let mut state = create_default_state();
        state.inventory.set(ResourceId::Racks, -1.0);
        assert_eq!(
            check_invariants(&state),
            vec![InvariantViolation::BadInventory {
                resource: ResourceId::Racks,
                quantity: -1.0
            }]
        );
    }

    #[test]
    fn facility_fields_flagged() {
        let mut state = create_default_state();
        state.facilities[FacilityType::FuelDepot] = Facility {
            count: 1,
            level: 0,
            efficiency: 1.2,
        };
        let violations = check_invariants(&state);
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&InvariantViolation::LevelBelowOne {
            facility: FacilityType::FuelDepot
        }));
    }

    #[test]
    fn mismatched_binding_flagged() {
        let mut state = create_default_state();
        state.active_recipes[FacilityType::RackLine] = ActiveRecipe::new(RecipeId::MakeChips);
        assert_eq!(
            check_invariants(&state),
            vec![InvariantViolation::RecipeMismatch {
                facility: FacilityType::RackLine,
                recipe: RecipeId::MakeChips
            }]
        );
    }

    #[test]
    fn negative_counter_flagged() {
        let mut state = create_default_state();
        state.units_ready_on_ground = -3.0;
        assert!(matches!(
            check_invariants(&state).as_slice(),
            [InvariantViolation::BadCounter {
                name: "units_ready_on_ground",
                ..
            }]
        ));
    }

    #[test]
    fn identical_states_have_no_diff() {
        let diff = diff_states(&create_default_state(), &create_default_state());
        assert!(diff.is_identical);
        assert!(diff.diffs.is_empty());
    }

    #[test]
    fn diff_reports_each_field() {
        let a = create_default_state();
        let mut b = a.clone();
        b.inventory.add(ResourceId::Fuel, 1.0);
        b.facilities[FacilityType::ChipFab].count = 2;
        b.facilities[FacilityType::ChipFab].level = 2;
        b.active_recipes[FacilityType::PodFactory] = ActiveRecipe::new(RecipeId::IntegratePods);
        b.units_built_total = 1.0;

        let diff = diff_states(&a, &b);
        assert!(!diff.is_identical);
        assert_eq!(diff.diffs.len(), 4);
        assert!(diff.diffs.contains(&FieldDiff::Facility {
            facility: FacilityType::ChipFab,
            description: "count, level".to_string()
        }));
        assert!(diff.diffs.contains(&FieldDiff::Binding {
            facility: FacilityType::PodFactory,
            a: RecipeId::BuildPodShells,
            b: RecipeId::IntegratePods
        }));
    }

    #[test]
    fn diff_detects_signed_zero() {
        let a = create_default_state();
        let mut b = a.clone();
        b.inventory.set(ResourceId::Chips, -0.0);
        assert!(!diff_states(&a, &b).is_identical);
    }
}
