//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::facility::{Facility, FacilityType};
use crate::recipe::RecipeId;
use crate::resource::{Inventory, ResourceId};
use crate::state::{ActiveRecipe, FactoryState};

/// Default tolerance for [`assert_close`].
pub const EPSILON: f64 = 1e-9;

/// Build an inventory from `(resource, quantity)` pairs; the rest are zero.
pub fn inventory(amounts: &[(ResourceId, f64)]) -> Inventory {
    amounts
        .iter()
        .fold(Inventory::new(), |inv, &(r, q)| inv.with(r, q))
}

/// A factory where only `facility_type` has capacity.
pub fn single_facility_state(
    facility_type: FacilityType,
    facility: Facility,
    inventory: Inventory,
) -> FactoryState {
    let mut state = FactoryState::empty();
    state.facilities[facility_type] = facility;
    state.inventory = inventory;
    state
}

/// A factory with `lines` level-1 lines everywhere, the pod factory
/// integrating pods, and generous stock of every input.
pub fn integrating_factory(lines: u32) -> FactoryState {
    let mut state = FactoryState::empty();
    for (_, f) in state.facilities.iter_mut() {
        *f = Facility::with_lines(lines);
    }
    state.active_recipes[FacilityType::PodFactory] = ActiveRecipe::new(RecipeId::IntegratePods);
    state.inventory = inventory(&[
        (ResourceId::Cash, 10_000.0),
        (ResourceId::Chips, 500.0),
        (ResourceId::Racks, 100.0),
        (ResourceId::PodShells, 20.0),
        (ResourceId::Fuel, 200.0),
    ]);
    state
}

/// Assert two floats agree within [`EPSILON`], scaled by magnitude.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = EPSILON * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
